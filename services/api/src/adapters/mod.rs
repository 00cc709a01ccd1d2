pub mod analysis;
pub mod gateway;
pub mod store;
pub mod video;

pub use analysis::OpenAiAnalysisAdapter;
pub use gateway::OpenAiTutorGateway;
pub use store::PgCourseStore;
pub use video::{DisabledVideoLookup, YouTubeVideoAdapter};
