//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket connection.
//! It initializes a tutoring session for one course and delegates each chat
//! turn to the turn task.

use crate::web::{
    protocol::{ClientMessage, ServerMessage},
    state::AppState,
    turn_task::turn_process,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{
    stream::{SplitSink, StreamExt},
    SinkExt,
};
use skoolme_core::engine::TutorSession;
use skoolme_core::progress::find_current_lesson_index;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn send_json(
    ws_sender: &Arc<Mutex<SplitSink<WebSocket, Message>>>,
    message: &ServerMessage,
) -> bool {
    match serde_json::to_string(message) {
        Ok(json) => ws_sender
            .lock()
            .await
            .send(Message::Text(json.into()))
            .await
            .is_ok(),
        Err(e) => {
            error!("Failed to serialize server message: {}", e);
            false
        }
    }
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("New WebSocket connection established");

    // The sender is wrapped in an Arc<Mutex<>> to allow for shared mutable access across tasks.
    let (sender, mut receiver) = socket.split();
    let ws_sender = Arc::new(Mutex::new(sender));

    // --- 1. Initialization Phase ---
    let (course_id, session_lock): (Uuid, Arc<Mutex<TutorSession>>) =
        if let Some(Ok(Message::Text(init_json))) = receiver.next().await {
            match serde_json::from_str::<ClientMessage>(&init_json) {
                Ok(ClientMessage::Init { course_id }) => {
                    info!("Initializing tutoring session for course: {}", course_id);
                    match app_state
                        .sessions
                        .get_or_restore(app_state.store.as_ref(), course_id)
                        .await
                    {
                        Ok(Some(session_lock)) => {
                            let init_msg = {
                                let session = session_lock.lock().await;
                                let course = session.course();
                                let current = find_current_lesson_index(course);
                                ServerMessage::SessionInitialized {
                                    course_id,
                                    progress: course.progress,
                                    current_lesson: course
                                        .lessons
                                        .get(current)
                                        .map(|l| l.title.clone()),
                                }
                            };
                            if !send_json(&ws_sender, &init_msg).await {
                                error!("Failed to send session initialized message.");
                                return;
                            }
                            (course_id, session_lock)
                        }
                        Ok(None) => {
                            let err_msg = ServerMessage::Error {
                                message: format!("Course {} not found.", course_id),
                            };
                            let _ = send_json(&ws_sender, &err_msg).await;
                            return;
                        }
                        Err(e) => {
                            error!("Failed to restore session state: {:?}", e);
                            let err_msg = ServerMessage::Error {
                                message: "Failed to load course data.".to_string(),
                            };
                            let _ = send_json(&ws_sender, &err_msg).await;
                            return;
                        }
                    }
                }
                _ => {
                    error!("First message was not a valid Init message.");
                    return;
                }
            }
        } else {
            error!("Client disconnected before sending Init message.");
            return;
        };

    // --- 2. Main Message Loop ---
    loop {
        if let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    handle_text_message(
                        text.to_string(),
                        &app_state,
                        &session_lock,
                        &ws_sender,
                    )
                    .await;
                }
                Message::Close(_) => {
                    info!("Client sent close message.");
                    break;
                }
                _ => {}
            }
        } else {
            info!("Client disconnected.");
            break;
        }
    }

    // --- 3. Cleanup ---
    app_state.sessions.evict(course_id).await;
    info!("WebSocket connection closed.");
}

/// Helper function to handle the logic for different `ClientMessage` variants.
async fn handle_text_message(
    text: String,
    app_state: &Arc<AppState>,
    session_lock: &Arc<Mutex<TutorSession>>,
    ws_sender: &Arc<Mutex<SplitSink<WebSocket, Message>>>,
) {
    match serde_json::from_str::<ClientMessage>(&text) {
        Ok(client_msg) => match client_msg {
            ClientMessage::Chat { content } => {
                if let Err(e) = turn_process(
                    app_state.clone(),
                    session_lock.clone(),
                    ws_sender.clone(), // Cloning the Arc is cheap and correct.
                    content,
                )
                .await
                {
                    error!("Error in turn process: {:?}", e);
                }
            }
            ClientMessage::OpenSubspace { topic, question } => {
                let opened = {
                    let mut session = session_lock.lock().await;
                    let opened = session.open_subspace(&topic, &question);
                    if opened {
                        if let Err(e) = app_state.store.save(session.course()).await {
                            error!("Failed to persist course after subspace open: {:?}", e);
                        }
                    }
                    opened
                };
                // A second open while one is live is a no-op by contract; the
                // client is only notified of actual opens.
                if opened {
                    let msg = ServerMessage::SubspaceOpened { topic };
                    if !send_json(ws_sender, &msg).await {
                        error!("Failed to send SubspaceOpened message.");
                    }
                }
            }
            ClientMessage::Init { .. } => {
                warn!("Received subsequent Init message, which is ignored.");
            }
        },
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
        }
    }
}
