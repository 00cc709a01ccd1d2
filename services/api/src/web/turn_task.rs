//! services/api/src/web/turn_task.rs
//!
//! This module contains the asynchronous "worker" function responsible for
//! handling a single tutoring turn.

use crate::web::{protocol::ServerMessage, state::AppState};
use axum::extract::ws::{Message, WebSocket};
use futures::{stream::SplitSink, SinkExt};
use skoolme_core::engine::TutorSession;
use skoolme_core::ports::{PortError, PortResult};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Processes one chat turn to completion: runs the engine, persists the
/// updated course, and sends the result to the client. The engine itself
/// never fails a turn; the error cases here are socket and storage problems.
pub async fn turn_process(
    app_state: Arc<AppState>,
    session_lock: Arc<Mutex<TutorSession>>,
    ws_sender: Arc<Mutex<SplitSink<WebSocket, Message>>>,
    content: String,
) -> PortResult<()> {
    let start_time = Instant::now();

    let started = serde_json::to_string(&ServerMessage::TurnStarted)
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
    if ws_sender.lock().await.send(Message::Text(started.into())).await.is_err() {
        return Err(PortError::Unexpected(
            "Failed to send TurnStarted message.".to_string(),
        ));
    }

    let result = {
        let mut session = session_lock.lock().await;
        let result = session
            .handle_turn(app_state.gateway.as_ref(), app_state.video.as_ref(), &content)
            .await;

        // Persist before notifying; a save failure is logged but must not
        // swallow the response the student is waiting on.
        if let Err(e) = app_state.store.save(session.course()).await {
            error!("Failed to persist course after turn: {:?}", e);
        }
        result
    };
    info!("Turn processed in {:?}", start_time.elapsed());

    let payload = serde_json::to_string(&ServerMessage::from_turn(result))
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
    if ws_sender.lock().await.send(Message::Text(payload.into())).await.is_err() {
        return Err(PortError::Unexpected(
            "Failed to send Turn message to client.".to_string(),
        ));
    }

    Ok(())
}
