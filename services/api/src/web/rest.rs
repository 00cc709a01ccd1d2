//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use skoolme_core::assembly;
use skoolme_core::domain::CourseDraft;
use skoolme_core::engine::transcript_markdown;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_course_handler,
        list_courses_handler,
        get_course_handler,
        course_transcript_handler,
    ),
    components(
        schemas(CreateCourseRequest, CourseSummary)
    ),
    tags(
        (name = "SkoolMe API", description = "API endpoints for AI-tutored course creation and study.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The raw course material a student submits to build a course from.
#[derive(Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    pub title: String,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Names of uploaded files whose content feeds the course generator.
    #[serde(default)]
    pub files: Vec<String>,
}

/// A course as shown in the catalog listing.
#[derive(Serialize, ToSchema)]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    pub progress: u8,
    pub lesson_count: usize,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create a new course from submitted material.
///
/// Runs the course generator against the draft and persists the result.
/// Generation never fails outright: when the analysis service is unavailable
/// a template-based course is produced instead.
#[utoipa::path(
    post,
    path = "/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created successfully."),
        (status = 500, description = "Course could not be persisted.")
    ),
    tag = "SkoolMe API"
)]
pub async fn create_course_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateCourseRequest>,
) -> impl IntoResponse {
    let draft = CourseDraft {
        title: payload.title,
        school: payload.school,
        notes: payload.notes,
        files: payload.files,
    };

    info!("Assembling new course: '{}'", draft.title);
    let course = assembly::assemble(app_state.analysis.as_ref(), &draft).await;

    if let Err(e) = app_state.store.save(&course).await {
        error!("Failed to persist new course: {:?}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Failed to save course." })),
        )
            .into_response();
    }

    (StatusCode::CREATED, Json(serde_json::json!(course))).into_response()
}

/// List all saved courses.
#[utoipa::path(
    get,
    path = "/courses",
    responses(
        (status = 200, description = "All courses.", body = [CourseSummary]),
        (status = 500, description = "Courses could not be loaded.")
    ),
    tag = "SkoolMe API"
)]
pub async fn list_courses_handler(
    State(app_state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match app_state.store.list().await {
        Ok(courses) => {
            let summaries: Vec<CourseSummary> = courses
                .iter()
                .map(|course| CourseSummary {
                    id: course.id,
                    title: course.title.clone(),
                    progress: course.progress,
                    lesson_count: course.lessons.len(),
                })
                .collect();
            Json(summaries).into_response()
        }
        Err(e) => {
            error!("Failed to list courses: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to list courses." })),
            )
                .into_response()
        }
    }
}

/// Fetch one course in full, including lessons and conversation history.
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "The course identifier.")
    ),
    responses(
        (status = 200, description = "The full course."),
        (status = 404, description = "No course with that id exists.")
    ),
    tag = "SkoolMe API"
)]
pub async fn get_course_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match app_state.store.load(id).await {
        Ok(Some(course)) => Json(serde_json::json!(course)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Course not found." })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to load course {}: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to load course." })),
            )
                .into_response()
        }
    }
}

/// Export a course's main conversation as a Markdown transcript.
#[utoipa::path(
    get,
    path = "/courses/{id}/transcript",
    params(
        ("id" = Uuid, Path, description = "The course identifier.")
    ),
    responses(
        (status = 200, description = "The transcript as Markdown.", content_type = "text/markdown"),
        (status = 404, description = "No course with that id exists.")
    ),
    tag = "SkoolMe API"
)]
pub async fn course_transcript_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match app_state.store.load(id).await {
        Ok(Some(course)) => {
            let markdown = transcript_markdown(&course);
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
                markdown,
            )
                .into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Course not found." })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to load course {} for transcript: {:?}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to load course." })),
            )
                .into_response()
        }
    }
}
