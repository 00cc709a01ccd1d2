//! services/api/src/adapters/store.rs
//!
//! This module contains the persistence adapter, the concrete implementation
//! of the `CourseStore` port from the `core` crate. A course is stored as a
//! single JSONB document keyed by its id; the core treats persistence as an
//! opaque load/save collaborator, so no relational decomposition is needed.

use async_trait::async_trait;
use skoolme_core::domain::Course;
use skoolme_core::ports::{CourseStore, PortError, PortResult};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `CourseStore` port.
#[derive(Clone)]
pub struct PgCourseStore {
    pool: PgPool,
}

impl PgCourseStore {
    /// Creates a new `PgCourseStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// `CourseStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl CourseStore for PgCourseStore {
    async fn save(&self, course: &Course) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO courses (id, data, updated_at) VALUES ($1, $2, now()) \
             ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data, updated_at = now()",
        )
        .bind(course.id)
        .bind(Json(course))
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn load(&self, course_id: Uuid) -> PortResult<Option<Course>> {
        let row = sqlx::query("SELECT data FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        match row {
            Some(row) => {
                let Json(course): Json<Course> = row
                    .try_get("data")
                    .map_err(|e| PortError::Unexpected(e.to_string()))?;
                Ok(Some(course))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> PortResult<Vec<Course>> {
        let rows = sqlx::query("SELECT data FROM courses ORDER BY updated_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let Json(course): Json<Course> = row
                    .try_get("data")
                    .map_err(|e| PortError::Unexpected(e.to_string()))?;
                Ok(course)
            })
            .collect()
    }
}
