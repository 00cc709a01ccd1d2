//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        DisabledVideoLookup, OpenAiAnalysisAdapter, OpenAiTutorGateway, PgCourseStore,
        YouTubeVideoAdapter,
    },
    config::Config,
    error::ApiError,
    web::{
        course_transcript_handler, create_course_handler, get_course_handler,
        list_courses_handler, rest::ApiDoc, state::AppState, state::SessionRegistry, ws_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use skoolme_core::ports::{LanguageModelGateway, VideoLookupService};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(PgCourseStore::new(db_pool.clone()));
    info!("Running database migrations...");
    store.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let openai_client = Client::with_config(openai_config);

    let gateway = Arc::new(OpenAiTutorGateway::new(
        openai_client.clone(),
        config.tutor_model.clone(),
    ));
    if let Err(e) = gateway.initialize().await {
        // The engine degrades to canned fallbacks when the gateway is down,
        // so a failed probe is not fatal.
        warn!("Language model gateway probe failed: {:?}", e);
    }

    let analysis = Arc::new(OpenAiAnalysisAdapter::new(
        openai_client.clone(),
        config.analysis_model.clone(),
    ));

    let video: Arc<dyn VideoLookupService> = match &config.youtube_api_key {
        Some(key) => Arc::new(YouTubeVideoAdapter::new(reqwest::Client::new(), key.clone())),
        None => {
            warn!("YOUTUBE_API_KEY not set; video suggestions are disabled.");
            Arc::new(DisabledVideoLookup)
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        config: config.clone(),
        gateway,
        analysis,
        video,
        sessions: Arc::new(SessionRegistry::new()),
    });

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route(
            "/courses",
            post(create_course_handler).get(list_courses_handler),
        )
        .route("/courses/{id}", get(get_course_handler))
        .route("/courses/{id}/transcript", get(course_transcript_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
