//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the
//! API server for the tutoring chat.

use serde::{Deserialize, Serialize};
use skoolme_core::domain::VideoSuggestion;
use skoolme_core::engine::TurnResult;
use skoolme_core::progress::ProgressUpdate;
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Initializes a session. This must be the first message sent on the connection.
    Init { course_id: Uuid },

    /// One user chat turn for the tutor to process.
    Chat { content: String },

    /// Accepts a subspace suggestion: opens a focused discussion on `topic`,
    /// triggered by `question`.
    OpenSubspace { topic: String, question: String },
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Confirms successful session initialization with the course's current
    /// standing so the UI can render immediately.
    SessionInitialized {
        course_id: Uuid,
        progress: u8,
        current_lesson: Option<String>,
    },

    /// Reports a fatal error to the client, which should display an error message.
    Error { message: String },

    /// Signals that the server has accepted a chat turn and is working on it.
    /// The UI can show a "thinking..." state.
    TurnStarted,

    /// The completed turn: the tutor's response plus everything the UI needs
    /// to decorate it.
    Turn {
        content: String,
        follow_up_questions: Vec<String>,
        suggested_videos: Vec<VideoSuggestion>,
        needs_subspace: bool,
        subspace_closed: bool,
        progress: Option<ProgressUpdate>,
    },

    /// Confirms that a focused subspace discussion is now live.
    SubspaceOpened { topic: String },
}

impl ServerMessage {
    /// Builds the turn payload from the engine's result.
    pub fn from_turn(result: TurnResult) -> Self {
        ServerMessage::Turn {
            content: result.content,
            follow_up_questions: result.follow_up_questions,
            suggested_videos: result.suggested_videos,
            needs_subspace: result.needs_subspace,
            subspace_closed: result.subspace_closed,
            progress: result.progress,
        }
    }
}
