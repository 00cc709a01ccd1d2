pub mod protocol;
pub mod rest;
pub mod state;
pub mod turn_task;
pub mod ws_handler;

// Re-export the main WebSocket handler to make it easily accessible
// to the binary that will build the web server router.
pub use rest::{
    course_transcript_handler, create_course_handler, get_course_handler, list_courses_handler,
};
pub use ws_handler::ws_handler;
