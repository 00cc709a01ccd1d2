//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the registry of live tutoring
//! sessions.
//!
//! Only the course document is durable. The rest of a `TutorSession` (the
//! session state, the gateway handle, the suggestion cooldown) is transient
//! and is discarded on eviction: a client that disconnects mid-subspace
//! reconnects into the main chat, with the subspace record left as it was
//! last persisted.

use crate::config::Config;
use skoolme_core::engine::TutorSession;
use skoolme_core::ports::{
    ContentAnalysisService, CourseStore, LanguageModelGateway, PortResult, VideoLookupService,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CourseStore>,
    pub config: Arc<Config>,
    pub gateway: Arc<dyn LanguageModelGateway>,
    pub analysis: Arc<dyn ContentAnalysisService>,
    pub video: Arc<dyn VideoLookupService>,
    pub sessions: Arc<SessionRegistry>,
}

//=========================================================================================
// SessionRegistry (Live TutorSessions, One Per Course)
//=========================================================================================

/// Holds the live tutoring sessions. Each course gets at most one session,
/// guarded by its own `Mutex` so one turn is processed to completion before
/// the next is accepted — there are no overlapping turns against a course.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<TutorSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the live session for the course, restoring it from the store
    /// when none is in memory. `Ok(None)` means the course does not exist.
    pub async fn get_or_restore(
        &self,
        store: &dyn CourseStore,
        course_id: Uuid,
    ) -> PortResult<Option<Arc<Mutex<TutorSession>>>> {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(&course_id) {
            return Ok(Some(session.clone()));
        }

        match store.load(course_id).await? {
            Some(course) => {
                let session = Arc::new(Mutex::new(TutorSession::new(course)));
                sessions.insert(course_id, session.clone());
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// Drops the in-memory session for a course, e.g. after a client
    /// disconnect. The persisted course is untouched; transient session
    /// state (live subspace, cooldown) goes with the eviction.
    pub async fn evict(&self, course_id: Uuid) {
        self.sessions.lock().await.remove(&course_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use skoolme_core::domain::{AssessmentPlan, Course, CourseOutline, Difficulty};
    use skoolme_core::engine::SessionState;
    use skoolme_core::ports::PortResult;

    struct InMemoryStore {
        courses: Mutex<HashMap<Uuid, Course>>,
    }

    impl InMemoryStore {
        fn with(course: Course) -> Self {
            let mut courses = HashMap::new();
            courses.insert(course.id, course);
            Self {
                courses: Mutex::new(courses),
            }
        }
    }

    #[async_trait]
    impl CourseStore for InMemoryStore {
        async fn save(&self, course: &Course) -> PortResult<()> {
            self.courses.lock().await.insert(course.id, course.clone());
            Ok(())
        }

        async fn load(&self, course_id: Uuid) -> PortResult<Option<Course>> {
            Ok(self.courses.lock().await.get(&course_id).cloned())
        }

        async fn list(&self) -> PortResult<Vec<Course>> {
            Ok(self.courses.lock().await.values().cloned().collect())
        }
    }

    fn course() -> Course {
        Course {
            id: Uuid::new_v4(),
            title: "Algebra".to_string(),
            school: None,
            notes: None,
            files: vec![],
            outline: CourseOutline {
                title: "Algebra".to_string(),
                description: String::new(),
                duration: "4-6 hours".to_string(),
                difficulty: Difficulty::Intermediate,
            },
            lessons: vec![],
            progress: 0,
            conversations: vec![],
            subspaces: vec![],
            assessments: AssessmentPlan::default(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn restore_returns_the_same_live_session() {
        let course = course();
        let id = course.id;
        let store = InMemoryStore::with(course);
        let registry = SessionRegistry::new();

        let first = registry.get_or_restore(&store, id).await.unwrap().unwrap();
        let second = registry.get_or_restore(&store, id).await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn unknown_course_restores_to_none() {
        let store = InMemoryStore::with(course());
        let registry = SessionRegistry::new();
        let missing = registry
            .get_or_restore(&store, Uuid::new_v4())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn eviction_discards_transient_session_state() {
        let course = course();
        let id = course.id;
        let store = InMemoryStore::with(course);
        let registry = SessionRegistry::new();

        let session = registry.get_or_restore(&store, id).await.unwrap().unwrap();
        session
            .lock()
            .await
            .open_subspace("factoring", "how does factoring work?");
        registry.evict(id).await;

        // The subspace was never persisted, so the reconnecting client gets a
        // fresh session built from the stored course: back at the start, no
        // live subspace.
        let restored = registry.get_or_restore(&store, id).await.unwrap().unwrap();
        assert!(!Arc::ptr_eq(&session, &restored));
        let restored = restored.lock().await;
        assert_eq!(restored.state(), SessionState::Idle);
        assert!(restored.course().subspaces.is_empty());
    }
}
