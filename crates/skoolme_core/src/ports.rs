//! crates/skoolme_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like the LLM
//! provider, the video search API or the database.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Course, CourseDraft, VideoSuggestion};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for non-gateway port operations (storage, lookups).
/// This abstracts away the specific errors from external services.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// The failure taxonomy of the language-model boundary. Every variant is
/// caught at the session-engine / course-assembly boundary and converted to a
/// user-facing fallback; none of them propagate past the core.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway authentication failed: {0}")]
    Auth(String),
    #[error("Gateway quota exhausted: {0}")]
    Quota(String),
    #[error("Gateway network failure: {0}")]
    Network(String),
    #[error("Gateway request timed out: {0}")]
    Timeout(String),
    #[error("Gateway error: {0}")]
    Other(String),
}

/// A convenience type alias for `Result<T, GatewayError>`.
pub type GatewayResult<T> = Result<T, GatewayError>;

//=========================================================================================
// Gateway Session Types
//=========================================================================================

/// An opaque reference to one conversational session held by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(pub Uuid);

impl SessionHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// The scripted opening exchange a tutoring session is seeded with: the
/// system-style user framing plus the model's canned greeting.
#[derive(Debug, Clone)]
pub struct SeedExchange {
    pub user: String,
    pub model: String,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The external language-model service the core delegates natural-language
/// generation to.
#[async_trait]
pub trait LanguageModelGateway: Send + Sync {
    /// Verifies that the gateway is reachable and the credentials work.
    async fn initialize(&self) -> GatewayResult<()>;

    /// Opens a conversational session primed with a system prompt and the
    /// seed exchange; subsequent turns on the handle carry its history.
    async fn start_session(
        &self,
        system_prompt: &str,
        seed: &SeedExchange,
    ) -> GatewayResult<SessionHandle>;

    /// Sends one user turn on an open session and returns the response text.
    async fn send_turn(&self, handle: SessionHandle, text: &str) -> GatewayResult<String>;
}

/// Produces the structured course text that course assembly parses. Used only
/// during course creation.
#[async_trait]
pub trait ContentAnalysisService: Send + Sync {
    async fn generate_structured_course(&self, draft: &CourseDraft) -> GatewayResult<String>;
}

/// Searches an external video catalog for instructional material.
#[async_trait]
pub trait VideoLookupService: Send + Sync {
    async fn search(&self, query: &str, max_results: u8) -> PortResult<Vec<VideoSuggestion>>;
}

/// Persistence for courses, keyed by course id. Absence is a normal (not
/// error) case, hence the `Option` on `load`.
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn save(&self, course: &Course) -> PortResult<()>;
    async fn load(&self, course_id: Uuid) -> PortResult<Option<Course>>;
    async fn list(&self) -> PortResult<Vec<Course>>;
}
