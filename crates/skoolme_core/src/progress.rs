//! crates/skoolme_core/src/progress.rs
//!
//! Pure state mutation over a course's lesson list plus the derived progress
//! percentage. This module never talks to the language-model gateway.

use serde::Serialize;

use crate::domain::Course;

/// The outcome of marking one lesson complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    pub current_index: usize,
    pub next_index: usize,
    /// True when `next_index` runs off the end of the lesson list.
    pub is_complete: bool,
    /// The recomputed course percentage.
    pub progress: u8,
}

/// Marks `lessons[lesson_index]` complete and recomputes `course.progress`
/// as `round(100 * completed / total)`. Returns `None` (and mutates nothing)
/// when the index is out of range.
pub fn mark_lesson_complete(course: &mut Course, lesson_index: usize) -> Option<ProgressUpdate> {
    let total = course.lessons.len();
    let lesson = course.lessons.get_mut(lesson_index)?;
    lesson.completed = true;

    let completed = course.completed_lesson_count();
    course.progress = ((completed as f64 / total as f64) * 100.0).round() as u8;

    Some(ProgressUpdate {
        current_index: lesson_index,
        next_index: lesson_index + 1,
        is_complete: lesson_index + 1 >= total,
        progress: course.progress,
    })
}

/// Index of the first incomplete lesson, or `lessons.len()` as the sentinel
/// meaning the course is finished.
pub fn find_current_lesson_index(course: &Course) -> usize {
    course
        .lessons
        .iter()
        .position(|lesson| !lesson.completed)
        .unwrap_or(course.lessons.len())
}
