//! crates/skoolme_core/src/classifier.rs
//!
//! Heuristic text classification over user and tutor messages. Everything
//! here is substring containment against fixed keyword lists on lower-cased
//! text; there is no tokenizer and no stemming. The keyword lists are
//! configuration data, but the length thresholds and the suggestion cooldown
//! are contract and are exercised by the tests below.

use std::time::{Duration, Instant};

/// A complex question only counts when the message is longer than this.
pub const COMPLEX_QUESTION_MIN_CHARS: usize = 25;

/// A tutor response longer than this marks the topic as heavyweight enough
/// to justify a focused subspace.
pub const LONG_RESPONSE_MIN_CHARS: usize = 400;

/// Minimum gap between two subspace suggestions.
pub const SUBSPACE_SUGGESTION_COOLDOWN: Duration = Duration::from_millis(60_000);

/// Phrases signalling the student is ready to move on.
const COMPLETION_KEYWORDS: &[&str] = &[
    "continue", "next", "move on", "proceed", "understood", "got it", "clear", "ready",
    "next topic", "next lesson", "finished", "done",
];

/// Phrases signalling an open question; any of these vetoes completion.
const QUESTION_KEYWORDS: &[&str] = &[
    "what", "how", "why", "explain", "clarify", "confused", "dont understand", "help",
    "more", "elaborate", "example",
];

/// Direct confusion signals, checked first when weighing a subspace.
const CONFUSION_PHRASES: &[&str] = &[
    "i don't understand",
    "don't understand",
    "confused",
    "confusing",
    "what do you mean",
    "can you explain",
    "explain more",
    "i'm lost",
    "makes no sense",
    "doesn't make sense",
    "clarify",
    "break it down",
    "elaborate",
    "what does that mean",
    "i need help",
    "struggling with",
    "hard to follow",
    "difficult to understand",
    "this is hard",
    "i'm confused about",
    "not clear",
    "unclear",
];

/// Question shapes that tend to need a worked, step-by-step answer.
const COMPLEX_QUESTION_PHRASES: &[&str] = &[
    "how does",
    "why does",
    "what happens when",
    "what if",
    "can you show me",
    "give me an example",
    "walk me through",
    "how do i",
    "what's the difference",
    "compared to",
];

/// Student phrases that close a live subspace.
const CLOSE_SUBSPACE_PHRASES: &[&str] = &[
    "okay i understand now",
    "i get it now",
    "got it",
    "i understand",
    "makes sense now",
    "that makes sense",
    "thanks that helps",
    "thank you",
    "that clears it up",
    "close",
    "exit",
    "back to main chat",
    "return to main chat",
];

/// Student phrases signalling the concept has landed.
const UNDERSTANDING_PHRASES: &[&str] = &[
    "understand",
    "makes sense",
    "clear now",
    "got it",
    "i see",
    "that helps",
    "thanks",
    "perfect",
];

/// Tutor phrases that steer the conversation back to the main chat.
const RETURN_TO_MAIN_PHRASES: &[&str] = &["return to main", "back to main", "continue with"];

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    phrases.iter().any(|phrase| lowered.contains(phrase))
}

/// True when the message contains a completion keyword ("continue", "got
/// it", "done", ...).
pub fn detects_completion_intent(text: &str) -> bool {
    contains_any(text, COMPLETION_KEYWORDS)
}

/// True when the message contains a question keyword ("what", "how",
/// "explain", ...).
pub fn detects_open_question(text: &str) -> bool {
    contains_any(text, QUESTION_KEYWORDS)
}

/// The topic-completion verdict for one user message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicCompletion {
    pub is_complete: bool,
    pub has_questions: bool,
    pub confidence: f32,
}

/// Decides whether the student considers the current topic finished. The
/// presence of any question keyword always vetoes completion, even when a
/// completion keyword is also present.
pub fn classify_topic_completion(text: &str) -> TopicCompletion {
    let wants_to_continue = detects_completion_intent(text);
    let has_questions = detects_open_question(text);
    TopicCompletion {
        is_complete: wants_to_continue && !has_questions,
        has_questions,
        confidence: if wants_to_continue { 0.8 } else { 0.3 },
    }
}

/// True when the message signals confusion directly.
pub fn detects_confusion(text: &str) -> bool {
    contains_any(text, CONFUSION_PHRASES)
}

/// True when the message is a how/why/what-if question and long enough to be
/// worth a deep-dive.
pub fn detects_complex_question(text: &str) -> bool {
    contains_any(text, COMPLEX_QUESTION_PHRASES) && text.chars().count() > COMPLEX_QUESTION_MIN_CHARS
}

/// True when the message asks to leave the live subspace, either by
/// expressing understanding or with an explicit exit command.
pub fn should_close_subspace(text: &str) -> bool {
    contains_any(text, CLOSE_SUBSPACE_PHRASES)
}

/// True when the student expresses understanding or the tutor's own reply
/// steers back to the main chat.
pub fn detects_understanding(user_text: &str, ai_text: &str) -> bool {
    contains_any(user_text, UNDERSTANDING_PHRASES) || contains_any(ai_text, RETURN_TO_MAIN_PHRASES)
}

/// Rate-limits subspace suggestions to one per cooldown window. The caller
/// supplies `now` so the clock can be simulated in tests.
#[derive(Debug, Clone)]
pub struct SubspaceGate {
    last_suggestion: Option<Instant>,
    cooldown: Duration,
}

impl SubspaceGate {
    pub fn new() -> Self {
        Self::with_cooldown(SUBSPACE_SUGGESTION_COOLDOWN)
    }

    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            last_suggestion: None,
            cooldown,
        }
    }

    /// Decides whether a subspace should be suggested for this turn. Returns
    /// false inside the cooldown window; otherwise suggests on direct
    /// confusion, or on a complex question answered at length. Records `now`
    /// whenever it returns true, which is what enforces the
    /// one-suggestion-per-window invariant.
    pub fn should_open(&mut self, user_text: &str, ai_text: &str, now: Instant) -> bool {
        if let Some(last) = self.last_suggestion {
            if now.duration_since(last) < self.cooldown {
                return false;
            }
        }

        let suggest = detects_confusion(user_text)
            || (detects_complex_question(user_text)
                && ai_text.chars().count() > LONG_RESPONSE_MIN_CHARS);

        if suggest {
            self.last_suggestion = Some(now);
        }
        suggest
    }
}

impl Default for SubspaceGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_without_questions_is_complete() {
        let verdict = classify_topic_completion("I understand, let's continue");
        assert!(verdict.is_complete);
        assert!(!verdict.has_questions);
        assert_eq!(verdict.confidence, 0.8);
    }

    #[test]
    fn question_keyword_vetoes_completion() {
        let verdict = classify_topic_completion("I understand but can you explain more?");
        assert!(!verdict.is_complete);
        assert!(verdict.has_questions);

        // The veto holds even when a completion keyword is literally present.
        let verdict = classify_topic_completion("got it, but what about friction?");
        assert!(!verdict.is_complete);
        assert!(verdict.has_questions);
        assert_eq!(verdict.confidence, 0.8);
    }

    #[test]
    fn plain_statement_has_low_confidence() {
        let verdict = classify_topic_completion("the mitochondria is the powerhouse");
        assert!(!verdict.is_complete);
        assert_eq!(verdict.confidence, 0.3);
    }

    #[test]
    fn complex_question_needs_more_than_25_chars() {
        // 26 characters, matching phrase.
        let long = "how does a battery work ok";
        assert_eq!(long.chars().count(), 26);
        assert!(detects_complex_question(long));

        // 24 characters, same phrase.
        let short = "how does a battery work?";
        assert_eq!(short.chars().count(), 24);
        assert!(!detects_complex_question(short));
    }

    #[test]
    fn long_response_threshold_is_strictly_400() {
        let question = "how does a battery work ok"; // 26 chars
        let long_answer = "a".repeat(401);
        let short_answer = "a".repeat(400);

        let mut gate = SubspaceGate::new();
        let t0 = Instant::now();
        assert!(gate.should_open(question, &long_answer, t0));

        let mut gate = SubspaceGate::new();
        assert!(!gate.should_open(question, &short_answer, t0));
    }

    #[test]
    fn confusion_alone_is_enough() {
        let mut gate = SubspaceGate::new();
        assert!(gate.should_open("i'm lost", "short answer", Instant::now()));
    }

    #[test]
    fn cooldown_blocks_second_suggestion_then_reopens() {
        let mut gate = SubspaceGate::new();
        let t0 = Instant::now();

        assert!(gate.should_open("i'm confused about this", "", t0));
        // Within the window: blocked even with qualifying text.
        assert!(!gate.should_open("i'm confused about this", "", t0 + Duration::from_secs(30)));
        // After the window elapses the gate opens again.
        assert!(gate.should_open("i'm confused about this", "", t0 + Duration::from_secs(61)));
    }

    #[test]
    fn non_qualifying_text_does_not_consume_the_window() {
        let mut gate = SubspaceGate::new();
        let t0 = Instant::now();
        assert!(!gate.should_open("sounds good", "fine", t0));
        // Nothing was recorded, so a qualifying message still fires.
        assert!(gate.should_open("i'm lost", "", t0 + Duration::from_secs(1)));
    }

    #[test]
    fn subspace_close_phrases() {
        assert!(should_close_subspace("okay got it, thanks"));
        assert!(should_close_subspace("EXIT"));
        assert!(!should_close_subspace("what about the second term?"));
    }

    #[test]
    fn understanding_from_either_side() {
        assert!(detects_understanding("that makes sense", ""));
        assert!(detects_understanding(
            "hmm",
            "Great, let's return to main chat and continue."
        ));
        assert!(!detects_understanding("hmm", "Here is more detail."));
    }
}
