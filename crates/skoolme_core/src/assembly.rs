//! crates/skoolme_core/src/assembly.rs
//!
//! Builds the initial lesson/assessment structure for a new course. The
//! happy path parses the structured text returned by the content-analysis
//! collaborator; every failure mode degrades through line-based extraction
//! down to static subject templates, so assembly itself can never fail.

use chrono::Utc;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    AssessmentPlan, Course, CourseDraft, CourseOutline, Difficulty, Lesson, LessonKind, Question,
    QuestionKind,
};
use crate::ports::ContentAnalysisService;

/// Default lesson length when the generator did not supply one.
const DEFAULT_LESSON_MINUTES: u32 = 45;

/// Failure to locate or decode the embedded JSON block. Always recoverable
/// via the line-based fallback; never user-visible.
#[derive(Debug, thiserror::Error)]
enum ParseError {
    #[error("response contains no JSON block")]
    NoJsonBlock,
    #[error("JSON block did not decode: {0}")]
    BadJson(#[from] serde_json::Error),
}

//=========================================================================================
// Generator Response Shapes
//=========================================================================================

#[derive(Debug, Deserialize)]
struct GeneratedStructure {
    outline: Option<GeneratedOutline>,
    #[serde(default)]
    lessons: Vec<GeneratedLesson>,
}

#[derive(Debug, Deserialize)]
struct GeneratedOutline {
    title: Option<String>,
    description: Option<String>,
    duration: Option<String>,
    difficulty: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GeneratedLesson {
    title: String,
    description: Option<String>,
    duration: Option<u32>,
    #[serde(default)]
    objectives: Vec<String>,
    #[serde(default, alias = "keyTerms")]
    key_terms: Vec<String>,
}

impl GeneratedLesson {
    fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            duration: None,
            objectives: Vec::new(),
            key_terms: Vec::new(),
        }
    }
}

//=========================================================================================
// Assembly Entry Point
//=========================================================================================

/// Assembles a complete course from the draft. Tries the analysis service
/// first, then the embedded-JSON parse, then line extraction, then the
/// static subject templates. Never returns an error.
pub async fn assemble(analysis: &dyn ContentAnalysisService, draft: &CourseDraft) -> Course {
    let mut outline = None;
    let mut generated = Vec::new();

    match analysis.generate_structured_course(draft).await {
        Ok(text) => match parse_structured(&text) {
            Ok(structure) => {
                outline = structure.outline;
                generated = structure.lessons;
            }
            Err(e) => {
                warn!("Structured course parse failed ({e}), falling back to line extraction");
                generated = extract_lesson_lines(&text);
            }
        },
        Err(e) => {
            warn!("Content analysis unavailable ({e}), using static course template");
        }
    }

    if generated.is_empty() {
        generated = fallback_lessons(&draft.title);
    }

    Course {
        id: Uuid::new_v4(),
        title: draft.title.clone(),
        school: draft.school.clone(),
        notes: draft.notes.clone(),
        files: draft.files.clone(),
        outline: build_outline(outline, draft),
        lessons: build_lessons(generated),
        progress: 0,
        conversations: Vec::new(),
        subspaces: Vec::new(),
        assessments: AssessmentPlan::default(),
        created_at: Utc::now(),
    }
}

//=========================================================================================
// Response Parsing
//=========================================================================================

/// Locates the outermost brace-delimited block and decodes it.
fn parse_structured(text: &str) -> Result<GeneratedStructure, ParseError> {
    let start = text.find('{').ok_or(ParseError::NoJsonBlock)?;
    let end = text.rfind('}').ok_or(ParseError::NoJsonBlock)?;
    if end < start {
        return Err(ParseError::NoJsonBlock);
    }
    Ok(serde_json::from_str(&text[start..=end])?)
}

/// Treats lines starting with a digit-dot, hyphen or asterisk marker as
/// lesson titles. Lines mentioning a test or exam are skipped so the
/// auto-generated assessments are not duplicated.
fn extract_lesson_lines(text: &str) -> Vec<GeneratedLesson> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.len() <= 10 {
                return None;
            }
            let title = strip_list_marker(line)?.trim();
            if title.is_empty() {
                return None;
            }
            let lowered = title.to_lowercase();
            if lowered.contains("test") || lowered.contains("exam") {
                return None;
            }
            Some(GeneratedLesson {
                title: title.to_string(),
                description: Some(format!("Comprehensive coverage of {}", lowered)),
                duration: None,
                objectives: vec![
                    format!("Understand {}", lowered),
                    "Apply concepts practically".to_string(),
                ],
                key_terms: Vec::new(),
            })
        })
        .collect()
}

/// Returns the line with its leading "1." / "-" / "*" marker removed, or
/// `None` when the line carries no marker.
fn strip_list_marker(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix('-').or_else(|| line.strip_prefix('*')) {
        return Some(rest);
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix('.') {
            return Some(rest);
        }
    }
    None
}

//=========================================================================================
// Static Fallback Templates
//=========================================================================================

/// Static topic lists keyed by subject keywords in the course title. The
/// output is deterministic for a given title.
fn fallback_lessons(title: &str) -> Vec<GeneratedLesson> {
    let lowered = title.to_lowercase();

    let topics: Vec<String> = if lowered.contains("physics") {
        [
            "Fundamental Forces and Motion",
            "Energy and Work Principles",
            "Waves and Oscillations",
            "Thermodynamics Basics",
            "Electromagnetic Fields",
            "Quantum Mechanics Introduction",
        ]
        .map(String::from)
        .to_vec()
    } else if lowered.contains("math") || lowered.contains("calculus") {
        [
            "Limits and Continuity",
            "Derivatives and Applications",
            "Integration Techniques",
            "Series and Sequences",
            "Multivariable Calculus",
            "Differential Equations",
        ]
        .map(String::from)
        .to_vec()
    } else if lowered.contains("chemistry") {
        [
            "Atomic Structure and Bonding",
            "Chemical Reactions and Stoichiometry",
            "Thermochemistry",
            "Chemical Equilibrium",
            "Acids and Bases",
            "Organic Chemistry Basics",
        ]
        .map(String::from)
        .to_vec()
    } else if lowered.contains("biology") {
        [
            "Cell Structure and Function",
            "Genetics and Heredity",
            "Evolution and Natural Selection",
            "Ecology and Ecosystems",
            "Human Anatomy and Physiology",
            "Molecular Biology",
        ]
        .map(String::from)
        .to_vec()
    } else if lowered.contains("history") {
        [
            "Historical Context and Timeline",
            "Key Figures and Events",
            "Social and Political Changes",
            "Economic Developments",
            "Cultural Transformations",
            "Legacy and Modern Impact",
        ]
        .map(String::from)
        .to_vec()
    } else if lowered.contains("computer") || lowered.contains("programming") {
        [
            "Programming Fundamentals",
            "Data Structures and Algorithms",
            "Object-Oriented Programming",
            "Database Management",
            "Web Development Basics",
            "Software Engineering Principles",
        ]
        .map(String::from)
        .to_vec()
    } else {
        vec![
            format!("Introduction to {}", title),
            "Fundamental Principles".to_string(),
            "Core Methodologies".to_string(),
            "Practical Applications".to_string(),
        ]
    };

    topics.into_iter().map(GeneratedLesson::titled).collect()
}

//=========================================================================================
// Lesson List Construction
//=========================================================================================

/// Turns generated lesson entries into the final timeline: the first lesson
/// pre-marked complete, the Mid-Course Assessment inserted at `ceil(n/2)`,
/// the Final Examination appended, and ids renumbered 1..N.
fn build_lessons(generated: Vec<GeneratedLesson>) -> Vec<Lesson> {
    let lesson_count = generated.len();
    let mut lessons: Vec<Lesson> = generated
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let content = entry
                .description
                .unwrap_or_else(|| format!("Let's explore {} in detail...", entry.title));
            let objectives = if entry.objectives.is_empty() {
                vec![
                    format!("Understand {}", entry.title),
                    "Apply concepts practically".to_string(),
                ]
            } else {
                entry.objectives
            };
            Lesson {
                id: 0, // renumbered below
                title: entry.title,
                completed: index == 0,
                kind: LessonKind::Lesson {
                    content,
                    duration: entry.duration.unwrap_or(DEFAULT_LESSON_MINUTES),
                    objectives,
                    key_terms: entry.key_terms,
                },
            }
        })
        .collect();

    let mid_point = lesson_count.div_ceil(2);
    lessons.insert(
        mid_point,
        Lesson {
            id: 0,
            title: "Mid-Course Assessment".to_string(),
            completed: false,
            kind: LessonKind::Test {
                questions: default_test_questions(),
                time_limit: 30,
            },
        },
    );

    lessons.push(Lesson {
        id: 0,
        title: "Final Examination".to_string(),
        completed: false,
        kind: LessonKind::Exam {
            questions: default_exam_questions(),
            time_limit: 60,
        },
    });

    for (index, lesson) in lessons.iter_mut().enumerate() {
        lesson.id = index as u32 + 1;
    }
    lessons
}

fn build_outline(generated: Option<GeneratedOutline>, draft: &CourseDraft) -> CourseOutline {
    let generated = generated.unwrap_or(GeneratedOutline {
        title: None,
        description: None,
        duration: None,
        difficulty: None,
    });

    let difficulty = match generated.difficulty.as_deref() {
        Some(label) if label.eq_ignore_ascii_case("beginner") => Difficulty::Beginner,
        Some(label) if label.eq_ignore_ascii_case("advanced") => Difficulty::Advanced,
        _ => Difficulty::Intermediate,
    };

    CourseOutline {
        title: generated.title.unwrap_or_else(|| draft.title.clone()),
        description: generated
            .description
            .unwrap_or_else(|| format!("A comprehensive course on {}", draft.title)),
        duration: generated.duration.unwrap_or_else(|| "4-6 hours".to_string()),
        difficulty,
    }
}

fn default_test_questions() -> Vec<Question> {
    vec![
        Question {
            id: 1,
            question: "Which of the following best describes the main concept?".to_string(),
            kind: QuestionKind::MultipleChoice {
                options: ["Option A", "Option B", "Option C", "Option D"]
                    .map(String::from)
                    .to_vec(),
                correct: 0,
            },
        },
        Question {
            id: 2,
            question: "The primary principle is ______.".to_string(),
            kind: QuestionKind::FillInBlank {
                answer: "fundamental".to_string(),
            },
        },
    ]
}

fn default_exam_questions() -> Vec<Question> {
    vec![Question {
        id: 1,
        question:
            "Explain the key concepts covered in this course and their practical applications."
                .to_string(),
        kind: QuestionKind::Essay { points: 25 },
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{GatewayError, GatewayResult};
    use async_trait::async_trait;

    struct CannedAnalysis(GatewayResult<String>);

    #[async_trait]
    impl ContentAnalysisService for CannedAnalysis {
        async fn generate_structured_course(&self, _draft: &CourseDraft) -> GatewayResult<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(GatewayError::Network("connection refused".to_string())),
            }
        }
    }

    fn draft(title: &str) -> CourseDraft {
        CourseDraft {
            title: title.to_string(),
            school: None,
            notes: None,
            files: vec![],
        }
    }

    fn assert_assessment_invariant(course: &Course, lesson_count: usize) {
        assert_eq!(course.lessons.len(), lesson_count + 2);

        let mid_point = lesson_count.div_ceil(2);
        assert_eq!(course.lessons[mid_point].title, "Mid-Course Assessment");
        assert!(matches!(
            course.lessons[mid_point].kind,
            LessonKind::Test { .. }
        ));
        assert_eq!(
            course
                .lessons
                .iter()
                .filter(|l| matches!(l.kind, LessonKind::Test { .. }))
                .count(),
            1
        );

        let last = course.lessons.last().unwrap();
        assert_eq!(last.title, "Final Examination");
        assert!(matches!(last.kind, LessonKind::Exam { .. }));

        // Ids form a contiguous 1..N sequence in final order.
        for (index, lesson) in course.lessons.iter().enumerate() {
            assert_eq!(lesson.id, index as u32 + 1);
        }
    }

    #[tokio::test]
    async fn parses_an_embedded_json_block() {
        let text = r#"Here is your course:
{
  "outline": {"title": "Waves", "description": "All about waves", "duration": "3 hours", "difficulty": "Advanced"},
  "lessons": [
    {"title": "Wave Basics", "duration": 30, "objectives": ["Define a wave"], "keyTerms": ["amplitude"]},
    {"title": "Interference"},
    {"title": "Standing Waves"}
  ]
}
Enjoy!"#;
        let course = assemble(&CannedAnalysis(Ok(text.to_string())), &draft("Waves")).await;

        assert_eq!(course.outline.title, "Waves");
        assert_eq!(course.outline.difficulty, Difficulty::Advanced);
        assert_assessment_invariant(&course, 3);
        assert_eq!(course.lessons[0].title, "Wave Basics");
        assert!(course.lessons[0].completed);
        match &course.lessons[0].kind {
            LessonKind::Lesson {
                duration,
                key_terms,
                ..
            } => {
                assert_eq!(*duration, 30);
                assert_eq!(key_terms, &["amplitude".to_string()]);
            }
            other => panic!("expected a lesson, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn falls_back_to_line_extraction_and_skips_assessment_lines() {
        let text = "Course plan follows\n\
                    1. Foundations of Logic\n\
                    2. Propositional Calculus\n\
                    - Predicate Reasoning\n\
                    * Proof Strategies in Depth\n\
                    3. Midterm Test Preparation\n\
                    short\n";
        let course = assemble(&CannedAnalysis(Ok(text.to_string())), &draft("Logic")).await;

        let titles: Vec<&str> = course
            .lessons
            .iter()
            .filter(|l| !l.is_assessment())
            .map(|l| l.title.as_str())
            .collect();
        assert_eq!(
            titles,
            [
                "Foundations of Logic",
                "Propositional Calculus",
                "Predicate Reasoning",
                "Proof Strategies in Depth",
            ]
        );
        assert_assessment_invariant(&course, 4);
    }

    #[tokio::test]
    async fn gateway_failure_yields_a_usable_course() {
        let failing = CannedAnalysis(Err(GatewayError::Network(String::new())));
        let course = assemble(&failing, &draft("Intro to Physics")).await;

        assert!(!course.lessons.is_empty());
        assert_eq!(course.outline.title, "Intro to Physics");
        assert_eq!(
            course.outline.description,
            "A comprehensive course on Intro to Physics"
        );
        assert_assessment_invariant(&course, 6);
    }

    #[tokio::test]
    async fn static_fallback_is_deterministic() {
        let failing = CannedAnalysis(Err(GatewayError::Network(String::new())));
        let first = assemble(&failing, &draft("Intro to Physics")).await;
        let second = assemble(&failing, &draft("Intro to Physics")).await;

        let titles = |c: &Course| c.lessons.iter().map(|l| l.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&first), titles(&second));
        assert!(first.lessons[0].completed);
        assert!(second.lessons[0].completed);
    }

    #[tokio::test]
    async fn unknown_subject_uses_the_generic_template() {
        let failing = CannedAnalysis(Err(GatewayError::Network(String::new())));
        let course = assemble(&failing, &draft("Basket Weaving")).await;

        assert_eq!(course.lessons[0].title, "Introduction to Basket Weaving");
        assert_assessment_invariant(&course, 4);
    }

    #[tokio::test]
    async fn garbage_text_with_no_lessons_still_falls_back() {
        let course = assemble(
            &CannedAnalysis(Ok("no structure here at all".to_string())),
            &draft("Chemistry 101"),
        )
        .await;

        // Parse yielded zero lessons, so the static chemistry template applies.
        assert_eq!(course.lessons[0].title, "Atomic Structure and Bonding");
        assert_assessment_invariant(&course, 6);
    }
}
