//! crates/skoolme_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or transport format; they
//! derive `serde` so the store can persist a whole course as one document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The user-supplied input a course is created from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseDraft {
    pub title: String,
    pub school: Option<String>,
    pub notes: Option<String>,
    /// Names of uploaded source files; the files themselves stay with the host.
    #[serde(default)]
    pub files: Vec<String>,
}

/// A generated curriculum instance with lessons, assessments and a running
/// conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub school: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
    pub outline: CourseOutline,
    pub lessons: Vec<Lesson>,
    /// Percent 0-100. Derived: recomputed by the progress tracker whenever a
    /// lesson's completion flag changes, never set independently.
    pub progress: u8,
    pub conversations: Vec<Message>,
    pub subspaces: Vec<Subspace>,
    pub assessments: AssessmentPlan,
    pub created_at: DateTime<Utc>,
}

impl Course {
    pub fn completed_lesson_count(&self) -> usize {
        self.lessons.iter().filter(|l| l.completed).count()
    }
}

/// The high-level description shown on a course card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseOutline {
    pub title: String,
    pub description: String,
    /// Display string, e.g. "4-6 hours".
    pub duration: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// One unit of the course timeline. `id` is the 1-based position and is
/// re-assigned whenever the list is restructured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    pub completed: bool,
    #[serde(flatten)]
    pub kind: LessonKind,
}

impl Lesson {
    pub fn is_assessment(&self) -> bool {
        !matches!(self.kind, LessonKind::Lesson { .. })
    }
}

/// The variant data carried by each kind of timeline entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LessonKind {
    Lesson {
        content: String,
        /// Minutes.
        duration: u32,
        objectives: Vec<String>,
        key_terms: Vec<String>,
    },
    Test {
        questions: Vec<Question>,
        /// Minutes.
        time_limit: u32,
    },
    Exam {
        questions: Vec<Question>,
        /// Minutes.
        time_limit: u32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub question: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice {
        options: Vec<String>,
        /// Index into `options`.
        correct: usize,
    },
    FillInBlank {
        answer: String,
    },
    Essay {
        points: u32,
    },
}

/// One entry in a conversation transcript. Append-only; ordering is arrival
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Ai, content)
    }

    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Ai,
}

/// An isolated, topic-focused sub-conversation spawned from the main chat.
/// Owned by its course; records persist after the live discussion ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subspace {
    pub id: Uuid,
    pub topic: String,
    /// The user text that triggered the deep-dive.
    pub question: String,
    pub messages: Vec<Message>,
    /// True only when the subspace was closed with a positive understanding
    /// signal, false when force-closed by an explicit exit command.
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

/// Summary of the auto-generated assessments attached to every course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentPlan {
    pub mid_test: AssessmentSummary,
    pub final_exam: AssessmentSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub questions: u32,
    pub time_limit: u32,
    pub passing_score: u32,
}

impl Default for AssessmentPlan {
    fn default() -> Self {
        Self {
            mid_test: AssessmentSummary {
                questions: 10,
                time_limit: 30,
                passing_score: 70,
            },
            final_exam: AssessmentSummary {
                questions: 25,
                time_limit: 60,
                passing_score: 80,
            },
        }
    }
}

/// A video surfaced by the lookup collaborator alongside a tutor response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSuggestion {
    pub title: String,
    pub video_id: String,
    pub url: String,
    pub duration_seconds: u32,
    pub thumbnail_url: String,
}
