//! crates/skoolme_core/src/subspace.rs
//!
//! Lifecycle of a focused sub-conversation. A subspace record lives in
//! `course.subspaces` forever; only the session engine tracks which one (if
//! any) is currently receiving turns.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Course, Message, Subspace};

/// The bridging line appended to the main conversation when a subspace is
/// closed with a positive understanding signal.
const RESOLVED_BRIDGE: &str =
    "Great work on that deep-dive! We're back in the main course now, picking up where we left off.";

/// The bridging line for a force-closed subspace.
const UNRESOLVED_BRIDGE: &str =
    "No problem, we can come back to that topic any time. Back to the main course.";

/// Appends a new subspace record to the course and returns its index. The
/// caller is responsible for ensuring no other subspace is live.
pub fn open(course: &mut Course, topic: impl Into<String>, question: impl Into<String>) -> usize {
    course.subspaces.push(Subspace {
        id: Uuid::new_v4(),
        topic: topic.into(),
        question: question.into(),
        messages: Vec::new(),
        resolved: false,
        created_at: Utc::now(),
    });
    course.subspaces.len() - 1
}

/// Closes the subspace at `index`. `resolved` is true only for closes driven
/// by an understanding signal; an explicit exit command leaves it false. A
/// bridging message summarizing the return is appended to the main
/// conversation either way.
pub fn close(course: &mut Course, index: usize, resolved: bool) {
    if let Some(subspace) = course.subspaces.get_mut(index) {
        subspace.resolved = resolved;
    }
    let bridge = if resolved {
        RESOLVED_BRIDGE
    } else {
        UNRESOLVED_BRIDGE
    };
    course.conversations.push(Message::ai(bridge));
}
