//! crates/skoolme_core/src/engine.rs
//!
//! The tutor session engine: one `TutorSession` per course, processing one
//! conversational turn at a time. Each turn consults the heuristic
//! classifier, decides between advancing the lesson timeline and a normal
//! gateway chat turn, and weighs whether a focused subspace should open or
//! close. Gateway failures never escape a turn; they degrade to a fixed
//! apologetic response.

use std::time::Instant;

use tracing::warn;

use crate::classifier::{
    classify_topic_completion, detects_understanding, should_close_subspace, SubspaceGate,
};
use crate::domain::{Course, Lesson, LessonKind, Message, MessageRole, VideoSuggestion};
use crate::ports::{
    GatewayError, GatewayResult, LanguageModelGateway, SeedExchange, SessionHandle,
    VideoLookupService,
};
use crate::progress::{find_current_lesson_index, mark_lesson_complete, ProgressUpdate};
use crate::subspace;

/// Follow-up prompts used when the response text contains no questions of
/// its own, and on every fallback turn.
const DEFAULT_FOLLOW_UPS: [&str; 3] = [
    "Would you like me to explain this with an example?",
    "Do you have any questions about this concept?",
    "Should we practice with some exercises?",
];

/// Response keywords that make a video lookup worthwhile at all.
const VIDEO_KEYWORDS: &[&str] = &[
    "video",
    "watch",
    "youtube",
    "tutorial",
    "demonstration",
    "explain",
    "lesson",
];

/// Minimum duration for a suggested video; filters out shorts.
const MIN_VIDEO_SECONDS: u32 = 60;

/// The fixed response for a subspace closed by the student's own signal.
const SUBSPACE_CLOSING_MESSAGE: &str = "Perfect! It looks like you've got a good grasp of this \
concept now. Let's return to the main course where we can continue with the next topics!";

/// Where a session currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No turn has been processed yet.
    Idle,
    /// The default tutoring conversation.
    MainChat,
    /// A focused sub-conversation is live; the payload is the index of its
    /// record in `course.subspaces`.
    InSubspace(usize),
}

/// Everything the UI needs to render one completed turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub content: String,
    pub follow_up_questions: Vec<String>,
    pub suggested_videos: Vec<VideoSuggestion>,
    /// True when this turn qualifies for a subspace suggestion.
    pub needs_subspace: bool,
    /// Present when a lesson was completed this turn.
    pub progress: Option<ProgressUpdate>,
    /// True when the live subspace was closed this turn.
    pub subspace_closed: bool,
}

impl TurnResult {
    fn plain(content: String) -> Self {
        Self {
            content,
            follow_up_questions: Vec::new(),
            suggested_videos: Vec::new(),
            needs_subspace: false,
            progress: None,
            subspace_closed: false,
        }
    }
}

/// Orchestrates the tutoring conversation for one course. Owns the course
/// state; the host persists it through [`TutorSession::course`] after each
/// turn.
pub struct TutorSession {
    course: Course,
    state: SessionState,
    handle: Option<SessionHandle>,
    gate: SubspaceGate,
}

impl TutorSession {
    pub fn new(course: Course) -> Self {
        Self {
            course,
            state: SessionState::Idle,
            handle: None,
            gate: SubspaceGate::new(),
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn into_course(self) -> Course {
        self.course
    }

    /// Processes one user turn to completion. Never fails: every gateway
    /// error is converted to an apologetic fallback response and logged.
    pub async fn handle_turn(
        &mut self,
        gateway: &dyn LanguageModelGateway,
        videos: &dyn VideoLookupService,
        message: &str,
    ) -> TurnResult {
        self.course.conversations.push(Message::user(message));

        if self.state == SessionState::Idle {
            self.state = SessionState::MainChat;
        }

        let result = match self.state {
            SessionState::InSubspace(index) => self.subspace_turn(gateway, index, message).await,
            _ => self.main_turn(gateway, videos, message).await,
        };

        self.course.conversations.push(Message::ai(result.content.clone()));
        result
    }

    /// Opens a focused subspace and makes it the live one. Opening while a
    /// subspace is already live is a precondition violation: it is logged
    /// and ignored, leaving existing state untouched.
    pub fn open_subspace(&mut self, topic: &str, question: &str) -> bool {
        if let SessionState::InSubspace(_) = self.state {
            warn!(topic, "Ignoring request to open a subspace while one is live");
            return false;
        }
        let index = subspace::open(&mut self.course, topic, question);
        self.state = SessionState::InSubspace(index);
        true
    }

    //=====================================================================================
    // Subspace Turns
    //=====================================================================================

    async fn subspace_turn(
        &mut self,
        gateway: &dyn LanguageModelGateway,
        index: usize,
        message: &str,
    ) -> TurnResult {
        if let Some(live) = self.course.subspaces.get_mut(index) {
            live.messages.push(Message::user(message));
        }

        if should_close_subspace(message) {
            // "got it" closes as resolved; a bare "exit"/"close" does not.
            let resolved = detects_understanding(message, "");
            self.close_live_subspace(index, resolved);
            let mut result = TurnResult::plain(SUBSPACE_CLOSING_MESSAGE.to_string());
            result.subspace_closed = true;
            return result;
        }

        let prompt = self.subspace_prompt(index, message);
        let response = match self.send_on_session(gateway, &prompt).await {
            Ok(text) => text,
            Err(e) => return self.fallback_turn(e),
        };

        if let Some(live) = self.course.subspaces.get_mut(index) {
            live.messages.push(Message::ai(response.clone()));
        }

        let mut result = TurnResult::plain(response.clone());
        if detects_understanding(message, &response) {
            self.close_live_subspace(index, true);
            result.subspace_closed = true;
        }
        result
    }

    fn close_live_subspace(&mut self, index: usize, resolved: bool) {
        subspace::close(&mut self.course, index, resolved);
        self.state = SessionState::MainChat;
    }

    fn subspace_prompt(&self, index: usize, message: &str) -> String {
        let (topic, history) = match self.course.subspaces.get(index) {
            Some(live) => {
                let history = live
                    .messages
                    .iter()
                    .map(|m| {
                        let who = match m.role {
                            MessageRole::User => "student",
                            MessageRole::Ai => "tutor",
                        };
                        format!("{who}: {}", m.content)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                (live.topic.as_str(), history)
            }
            None => ("this concept", String::new()),
        };

        format!(
            "This is a focused discussion about \"{topic}\".\n\
             Previous conversation in this subspace:\n{history}\n\n\
             Provide a detailed, helpful response that addresses the student's question about \
             this specific topic. Be thorough and use examples where appropriate. If the \
             student seems to understand, suggest returning to the main chat.\n\n\
             Student message: {message}"
        )
    }

    //=====================================================================================
    // Main Chat Turns
    //=====================================================================================

    async fn main_turn(
        &mut self,
        gateway: &dyn LanguageModelGateway,
        videos: &dyn VideoLookupService,
        message: &str,
    ) -> TurnResult {
        let completion = classify_topic_completion(message);
        let current = find_current_lesson_index(&self.course);

        let mut progress = None;
        let content = if completion.is_complete && current < self.course.lessons.len() {
            let completed_title = self.course.lessons[current].title.clone();
            // The index came from find_current_lesson_index, so the tracker
            // cannot refuse it; the update carries the recomputed progress.
            let update = mark_lesson_complete(&mut self.course, current)
                .expect("current lesson index is in range");
            progress = Some(update);

            if update.is_complete {
                course_completion_message(update)
            } else {
                transition_message(&completed_title, &self.course.lessons[update.next_index], update)
            }
        } else {
            match self.send_on_session(gateway, message).await {
                Ok(text) => text,
                Err(e) => return self.fallback_turn(e),
            }
        };

        // An advance-transition message takes priority over opening a
        // subspace, so the gate is only consulted on non-advancing turns.
        let needs_subspace = if progress.is_some() {
            false
        } else {
            self.gate.should_open(message, &content, Instant::now())
        };

        let suggested_videos = self.suggest_videos(videos, message, &content).await;

        TurnResult {
            follow_up_questions: extract_follow_up_questions(&content),
            suggested_videos,
            needs_subspace,
            progress,
            subspace_closed: false,
            content,
        }
    }

    fn fallback_turn(&self, error: GatewayError) -> TurnResult {
        warn!("Gateway call failed, returning fallback response: {error}");
        TurnResult {
            content: fallback_message(&error),
            follow_up_questions: DEFAULT_FOLLOW_UPS.map(String::from).to_vec(),
            suggested_videos: Vec::new(),
            needs_subspace: false,
            progress: None,
            subspace_closed: false,
        }
    }

    //=====================================================================================
    // Gateway Session Management
    //=====================================================================================

    async fn send_on_session(
        &mut self,
        gateway: &dyn LanguageModelGateway,
        text: &str,
    ) -> GatewayResult<String> {
        let handle = match self.handle {
            Some(handle) => handle,
            None => {
                let handle = gateway
                    .start_session(&self.system_prompt(), &self.seed_exchange())
                    .await?;
                self.handle = Some(handle);
                handle
            }
        };
        gateway.send_turn(handle, text).await
    }

    fn system_prompt(&self) -> String {
        let school = self
            .course
            .school
            .as_deref()
            .unwrap_or("General Education");
        format!(
            "You are an AI tutor for the course \"{title}\".\n\n\
             Course Context:\n\
             - Title: {title}\n\
             - School: {school}\n\
             - Current Progress: {progress}% complete\n\n\
             Your role:\n\
             1. Act as a knowledgeable, patient, and encouraging teacher\n\
             2. Explain concepts clearly with examples\n\
             3. Ask follow-up questions to ensure understanding\n\
             4. Break down complex concepts into simple steps\n\
             5. Provide positive reinforcement\n\n\
             Always respond as if you're having a one-on-one tutoring session with the student.",
            title = self.course.outline.title,
            school = school,
            progress = self.course.progress,
        )
    }

    fn seed_exchange(&self) -> SeedExchange {
        SeedExchange {
            user: "Introduce yourself and confirm you are ready to teach.".to_string(),
            model: format!(
                "Hello! I'm your AI tutor for \"{}\". I'm here to guide you through this \
                 learning journey step by step. Are you ready to begin your first lesson?",
                self.course.outline.title
            ),
        }
    }

    //=====================================================================================
    // Turn Decoration (Videos, Follow-ups)
    //=====================================================================================

    async fn suggest_videos(
        &self,
        videos: &dyn VideoLookupService,
        user_message: &str,
        response: &str,
    ) -> Vec<VideoSuggestion> {
        let lowered = response.to_lowercase();
        if !VIDEO_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return Vec::new();
        }

        let query = self.video_query(user_message, response);
        match videos.search(&query, 5).await {
            Ok(results) => results
                .into_iter()
                .find(|v| v.duration_seconds >= MIN_VIDEO_SECONDS)
                .into_iter()
                .collect(),
            Err(e) => {
                warn!("Video lookup failed, suggesting nothing: {e}");
                Vec::new()
            }
        }
    }

    /// Prefers the user's own phrasing, then the current lesson title, then
    /// the response text, capped at twelve words.
    fn video_query(&self, user_message: &str, response: &str) -> String {
        let lowered = user_message.to_lowercase();
        let user_asks_for_video = ["video", "tutorial", "explain", "lesson", "how to", "show"]
            .iter()
            .any(|k| lowered.contains(k));

        let current = find_current_lesson_index(&self.course);
        let lesson_title = self.course.lessons.get(current).map(|l| l.title.as_str());

        let base = if user_message.chars().count() > 10 && user_asks_for_video {
            user_message
        } else if let Some(title) = lesson_title.filter(|t| t.chars().count() > 5) {
            title
        } else {
            response
        };

        let mut query: Vec<&str> = base.split_whitespace().take(12).collect();
        query.push("tutorial");
        query.join(" ")
    }
}

/// Takes up to two "?"-terminated sentences from the response; substitutes
/// the three default prompts when none are found.
fn extract_follow_up_questions(text: &str) -> Vec<String> {
    let mut questions = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '?' => {
                current.push('?');
                let trimmed = current.trim();
                if trimmed.len() > 1 {
                    questions.push(trimmed.to_string());
                }
                current.clear();
            }
            '.' | '!' | '\n' => current.clear(),
            _ => current.push(c),
        }
        if questions.len() == 2 {
            break;
        }
    }

    if questions.is_empty() {
        return DEFAULT_FOLLOW_UPS.map(String::from).to_vec();
    }
    questions
}

fn transition_message(completed_title: &str, next: &Lesson, update: ProgressUpdate) -> String {
    let next_content = match &next.kind {
        LessonKind::Lesson { content, .. } => content.clone(),
        LessonKind::Test { .. } | LessonKind::Exam { .. } => {
            format!("Time to check your understanding with {}.", next.title)
        }
    };
    format!(
        "Great job! You've completed \"{completed_title}\"\n\n\
         Your progress: {progress}% completed\n\n\
         Now let's move on to: **{next_title}**\n\n\
         {next_content}\n\n\
         Are you ready to dive into this new topic?",
        progress = update.progress,
        next_title = next.title,
    )
}

fn course_completion_message(update: ProgressUpdate) -> String {
    format!(
        "Congratulations! You've completed the entire course!\n\n\
         Your final progress: {}% completed\n\n\
         You've successfully mastered all the topics in this course. Well done on your \
         learning journey! You can now download your complete course transcript for future \
         reference.",
        update.progress
    )
}

fn fallback_message(error: &GatewayError) -> String {
    let base = match error {
        GatewayError::Auth(_) => {
            "There's an issue with the AI service authentication. Please check the API \
             configuration."
        }
        GatewayError::Quota(_) => {
            "The AI service has reached its usage limit. Please try again later."
        }
        GatewayError::Network(_) => {
            "There's a network connection issue. Please check your internet connection and \
             try again."
        }
        GatewayError::Timeout(_) => {
            "The AI service is taking too long to respond. Please try again."
        }
        GatewayError::Other(_) => {
            "I apologize, but I'm having trouble processing your question right now."
        }
    };
    format!("{base} Could you please rephrase it or try asking something else?")
}

/// Renders the full main-chat transcript as a markdown document the host can
/// serve as a download.
pub fn transcript_markdown(course: &Course) -> String {
    let mut doc = format!(
        "# {title}\n\n{description}\n\nProgress: {progress}% completed\n\n## Transcript\n\n",
        title = course.outline.title,
        description = course.outline.description,
        progress = course.progress,
    );
    for message in &course.conversations {
        let who = match message.role {
            MessageRole::User => "You",
            MessageRole::Ai => "Tutor",
        };
        doc.push_str(&format!("**{who}:** {}\n\n", message.content));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssessmentPlan, CourseOutline, Difficulty};
    use crate::ports::PortResult;
    use async_trait::async_trait;
    use chrono::Utc;
    use uuid::Uuid;

    struct ScriptedGateway {
        response: Option<String>,
    }

    impl ScriptedGateway {
        fn answering(text: &str) -> Self {
            Self {
                response: Some(text.to_string()),
            }
        }

        fn failing() -> Self {
            Self { response: None }
        }
    }

    #[async_trait]
    impl LanguageModelGateway for ScriptedGateway {
        async fn initialize(&self) -> GatewayResult<()> {
            Ok(())
        }

        async fn start_session(
            &self,
            _system_prompt: &str,
            _seed: &SeedExchange,
        ) -> GatewayResult<SessionHandle> {
            match self.response {
                Some(_) => Ok(SessionHandle::new()),
                None => Err(GatewayError::Network("unreachable".to_string())),
            }
        }

        async fn send_turn(&self, _handle: SessionHandle, _text: &str) -> GatewayResult<String> {
            match &self.response {
                Some(text) => Ok(text.clone()),
                None => Err(GatewayError::Network("unreachable".to_string())),
            }
        }
    }

    struct NoVideos;

    #[async_trait]
    impl VideoLookupService for NoVideos {
        async fn search(&self, _query: &str, _max: u8) -> PortResult<Vec<VideoSuggestion>> {
            Ok(Vec::new())
        }
    }

    struct CannedVideos(Vec<VideoSuggestion>);

    #[async_trait]
    impl VideoLookupService for CannedVideos {
        async fn search(&self, _query: &str, _max: u8) -> PortResult<Vec<VideoSuggestion>> {
            Ok(self.0.clone())
        }
    }

    fn lesson(id: u32, title: &str, completed: bool) -> Lesson {
        Lesson {
            id,
            title: title.to_string(),
            completed,
            kind: LessonKind::Lesson {
                content: format!("Let's explore {title} in detail..."),
                duration: 45,
                objectives: vec![],
                key_terms: vec![],
            },
        }
    }

    fn course(lessons: Vec<Lesson>) -> Course {
        Course {
            id: Uuid::new_v4(),
            title: "Algebra".to_string(),
            school: None,
            notes: None,
            files: vec![],
            outline: CourseOutline {
                title: "Algebra".to_string(),
                description: "A comprehensive course on Algebra".to_string(),
                duration: "4-6 hours".to_string(),
                difficulty: Difficulty::Intermediate,
            },
            lessons,
            progress: 0,
            conversations: vec![],
            subspaces: vec![],
            assessments: AssessmentPlan::default(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn gateway_failure_degrades_to_the_fallback_turn() {
        let mut session = TutorSession::new(course(vec![lesson(1, "Variables", false)]));
        let result = session
            .handle_turn(&ScriptedGateway::failing(), &NoVideos, "tell me about variables")
            .await;

        assert!(result.content.contains("network connection issue"));
        assert_eq!(result.follow_up_questions.len(), 3);
        assert!(!result.needs_subspace);
        assert!(result.progress.is_none());
        // Both sides of the turn still land in the transcript.
        assert_eq!(session.course().conversations.len(), 2);
    }

    #[tokio::test]
    async fn normal_turn_returns_gateway_text_verbatim() {
        let gateway = ScriptedGateway::answering("An equation balances two expressions.");
        let mut session = TutorSession::new(course(vec![lesson(1, "Variables", false)]));
        let result = session
            .handle_turn(&gateway, &NoVideos, "tell me about equations please")
            .await;

        assert_eq!(result.content, "An equation balances two expressions.");
        assert_eq!(session.state(), SessionState::MainChat);
        assert!(result.progress.is_none());
        // No question marks in the response, so defaults are substituted.
        assert_eq!(result.follow_up_questions.len(), 3);
    }

    #[tokio::test]
    async fn completion_turn_advances_to_the_next_lesson() {
        let gateway = ScriptedGateway::answering("unused");
        let mut session = TutorSession::new(course(vec![
            lesson(1, "Variables", false),
            lesson(2, "Equations", false),
        ]));

        let result = session
            .handle_turn(&gateway, &NoVideos, "got it, ready to proceed")
            .await;

        let update = result.progress.expect("lesson should have advanced");
        assert_eq!(update.current_index, 0);
        assert_eq!(update.progress, 50);
        assert!(!update.is_complete);
        assert!(result.content.contains("Variables"));
        assert!(result.content.contains("**Equations**"));
        assert!(!result.needs_subspace);
        assert_eq!(session.course().progress, 50);
    }

    #[tokio::test]
    async fn finishing_the_last_lesson_composes_the_completion_message() {
        let gateway = ScriptedGateway::answering("unused");
        let mut session = TutorSession::new(course(vec![
            lesson(1, "Variables", true),
            lesson(2, "Equations", false),
        ]));

        let result = session.handle_turn(&gateway, &NoVideos, "done, next").await;

        let update = result.progress.unwrap();
        assert!(update.is_complete);
        assert_eq!(update.progress, 100);
        assert!(result.content.contains("100% completed"));
        assert!(result.content.contains("Congratulations"));
    }

    #[tokio::test]
    async fn after_course_completion_free_form_chat_remains_available() {
        let gateway = ScriptedGateway::answering("Happy to keep discussing!");
        let mut session = TutorSession::new(course(vec![lesson(1, "Variables", true)]));

        // All lessons complete: "continue" has nothing to advance, so the
        // turn goes to the gateway as a normal chat turn.
        let result = session.handle_turn(&gateway, &NoVideos, "let's continue").await;
        assert_eq!(result.content, "Happy to keep discussing!");
        assert!(result.progress.is_none());
    }

    #[tokio::test]
    async fn question_veto_keeps_the_lesson_open() {
        let gateway = ScriptedGateway::answering("Sure, here's more detail.");
        let mut session = TutorSession::new(course(vec![lesson(1, "Variables", false)]));

        let result = session
            .handle_turn(&gateway, &NoVideos, "got it, but why does that work?")
            .await;

        assert!(result.progress.is_none());
        assert_eq!(result.content, "Sure, here's more detail.");
    }

    #[tokio::test]
    async fn subspace_exit_command_closes_unresolved() {
        let gateway = ScriptedGateway::answering("unused");
        let mut session = TutorSession::new(course(vec![lesson(1, "Variables", false)]));
        assert!(session.open_subspace("factoring", "how does factoring work here?"));

        let result = session.handle_turn(&gateway, &NoVideos, "exit").await;

        assert!(result.subspace_closed);
        assert_eq!(session.state(), SessionState::MainChat);
        assert!(!session.course().subspaces[0].resolved);
    }

    #[tokio::test]
    async fn subspace_understanding_closes_resolved() {
        let gateway = ScriptedGateway::answering("unused");
        let mut session = TutorSession::new(course(vec![lesson(1, "Variables", false)]));
        session.open_subspace("factoring", "how does factoring work here?");

        let result = session
            .handle_turn(&gateway, &NoVideos, "okay i understand now, thanks")
            .await;

        assert!(result.subspace_closed);
        assert!(session.course().subspaces[0].resolved);
    }

    #[tokio::test]
    async fn subspace_turn_forwards_to_the_gateway_and_tracks_history() {
        let gateway = ScriptedGateway::answering("Factoring splits a product into its parts.");
        let mut session = TutorSession::new(course(vec![lesson(1, "Variables", false)]));
        session.open_subspace("factoring", "how does factoring work here?");

        let result = session
            .handle_turn(&gateway, &NoVideos, "walk me through one more case")
            .await;

        assert!(!result.subspace_closed);
        assert_eq!(session.state(), SessionState::InSubspace(0));
        let live = &session.course().subspaces[0];
        assert_eq!(live.messages.len(), 2);
        assert_eq!(live.messages[1].content, result.content);
    }

    #[tokio::test]
    async fn second_open_subspace_is_ignored() {
        let mut session = TutorSession::new(course(vec![lesson(1, "Variables", false)]));
        assert!(session.open_subspace("factoring", "first"));
        assert!(!session.open_subspace("expanding", "second"));

        assert_eq!(session.course().subspaces.len(), 1);
        assert_eq!(session.state(), SessionState::InSubspace(0));
    }

    #[tokio::test]
    async fn video_suggestion_takes_the_first_long_enough_result() {
        let gateway =
            ScriptedGateway::answering("Here's a tutorial style walkthrough. Want the video?");
        let videos = CannedVideos(vec![
            VideoSuggestion {
                title: "Short".to_string(),
                video_id: "a".to_string(),
                url: "https://youtube.com/watch?v=a".to_string(),
                duration_seconds: 45,
                thumbnail_url: String::new(),
            },
            VideoSuggestion {
                title: "Full lesson".to_string(),
                video_id: "b".to_string(),
                url: "https://youtube.com/watch?v=b".to_string(),
                duration_seconds: 300,
                thumbnail_url: String::new(),
            },
        ]);
        let mut session = TutorSession::new(course(vec![lesson(1, "Variables", false)]));

        let result = session
            .handle_turn(&gateway, &videos, "please show me a video about this")
            .await;

        assert_eq!(result.suggested_videos.len(), 1);
        assert_eq!(result.suggested_videos[0].video_id, "b");
    }

    #[tokio::test]
    async fn responses_without_video_keywords_skip_the_lookup() {
        let gateway = ScriptedGateway::answering("Just a plain answer.");
        let videos = CannedVideos(vec![VideoSuggestion {
            title: "Full lesson".to_string(),
            video_id: "b".to_string(),
            url: String::new(),
            duration_seconds: 300,
            thumbnail_url: String::new(),
        }]);
        let mut session = TutorSession::new(course(vec![lesson(1, "Variables", false)]));

        let result = session
            .handle_turn(&gateway, &videos, "tell me about variables then")
            .await;
        assert!(result.suggested_videos.is_empty());
    }

    #[test]
    fn follow_ups_extracts_at_most_two_questions() {
        let text = "First fact. Is that clear? Second fact! What would happen next? And a third question?";
        let questions = extract_follow_up_questions(text);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0], "Is that clear?");
        assert_eq!(questions[1], "What would happen next?");
    }

    #[test]
    fn transcript_renders_both_roles() {
        let mut c = course(vec![lesson(1, "Variables", false)]);
        c.conversations.push(Message::user("hi"));
        c.conversations.push(Message::ai("hello"));

        let doc = transcript_markdown(&c);
        assert!(doc.starts_with("# Algebra"));
        assert!(doc.contains("**You:** hi"));
        assert!(doc.contains("**Tutor:** hello"));
    }
}
