//! Live notification channel over WebSocket.
//!
//! ```text
//! NotificationDispatcher ──publish──▶ ConnectionRegistry ──mpsc──▶ socket task ──▶ client
//! ```
//!
//! - [`registry`] - process-wide user → channel map
//! - [`handler`] - `GET /api/live?token=` upgrade and socket loop
//! - [`messages`] - wire protocol

pub mod handler;
pub mod messages;
pub mod registry;

pub use handler::{live_handler, live_routes, LiveParams, LiveState};
pub use messages::{ClientMessage, ServerMessage};
pub use registry::{InMemoryConnectionRegistry, DEFAULT_CHANNEL_CAPACITY};
