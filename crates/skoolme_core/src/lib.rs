pub mod assembly;
pub mod classifier;
pub mod domain;
pub mod engine;
pub mod ports;
pub mod progress;
pub mod subspace;

pub use domain::{
    AssessmentPlan, Course, CourseDraft, CourseOutline, Difficulty, Lesson, LessonKind, Message,
    MessageRole, Question, QuestionKind, Subspace, VideoSuggestion,
};
pub use engine::{SessionState, TurnResult, TutorSession};
pub use ports::{
    ContentAnalysisService, CourseStore, GatewayError, GatewayResult, LanguageModelGateway,
    PortError, PortResult, SeedExchange, SessionHandle, VideoLookupService,
};
pub use progress::ProgressUpdate;
