//! Live channel message protocol.
//!
//! - Server → Client: connection ack, notification events, errors, pongs
//! - Client → Server: pings

use serde::{Deserialize, Serialize};

use crate::adapters::http::notifications::NotificationResponse;
use crate::domain::foundation::Timestamp;
use crate::ports::LiveEvent;

// ============================================
// Server → Client Messages
// ============================================

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Channel registered.
    Connected(ConnectedMessage),

    #[serde(rename = "notification.new")]
    NotificationNew(NotificationMessage),

    #[serde(rename = "notification.unread_count")]
    UnreadCount(UnreadCountMessage),

    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectedMessage {
    pub user_id: String,
    pub connection_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationMessage {
    pub notification: NotificationResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadCountMessage {
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

impl ServerMessage {
    pub fn pong() -> Self {
        ServerMessage::Pong(PongMessage {
            timestamp: now_rfc3339(),
        })
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorMessage {
            code: code.into(),
            message: message.into(),
            timestamp: now_rfc3339(),
        })
    }
}

impl From<LiveEvent> for ServerMessage {
    fn from(event: LiveEvent) -> Self {
        match event {
            LiveEvent::NotificationCreated(notification) => {
                ServerMessage::NotificationNew(NotificationMessage {
                    notification: NotificationResponse::from(&notification),
                })
            }
            LiveEvent::UnreadCount { count } => {
                ServerMessage::UnreadCount(UnreadCountMessage { count })
            }
        }
    }
}

pub(crate) fn now_rfc3339() -> String {
    Timestamp::now().as_datetime().to_rfc3339()
}

// ============================================
// Client → Server Messages
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping,
}
