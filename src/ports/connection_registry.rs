//! ConnectionRegistry port - process-wide map of live notification channels.
//!
//! A user may hold several live channels at once (tabs, devices). Each
//! channel is backed by a bounded queue; the registry only stores the sending
//! half and never blocks on a slow consumer.
//!
//! Lifecycle: created at startup, entries added on connect and removed on
//! disconnect, cleared at shutdown.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::foundation::UserId;
use crate::domain::notification::Notification;

/// Identifies one live channel of one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event pushed down a live channel.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    /// A notification was just created for this user.
    NotificationCreated(Notification),
    /// The user's unread count changed.
    UnreadCount { count: u64 },
}

impl LiveEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LiveEvent::NotificationCreated(_) => "notification.new",
            LiveEvent::UnreadCount { .. } => "notification.unread_count",
        }
    }
}

/// Sending half of a live channel queue.
pub type LiveSender = mpsc::Sender<LiveEvent>;

/// Errors that can occur in connection registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionRegistryError {
    /// No such connection for this user.
    #[error("Connection {connection_id} not found for user {user_id}")]
    NotFound {
        user_id: String,
        connection_id: ConnectionId,
    },

    /// The user had channels but none accepted the event.
    #[error("Delivery failed on all {attempted} channels of user {user_id}")]
    DeliveryFailed { user_id: String, attempted: usize },
}

/// Port for tracking live channels and pushing events to them.
///
/// Implementations must be safe under concurrent register/unregister from
/// many tasks, and must preserve per-channel event order.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Add a channel for a user whose credential was already verified.
    async fn register(&self, user_id: &UserId, sender: LiveSender) -> ConnectionId;

    /// Remove one channel.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the channel is not registered for this user
    async fn unregister(
        &self,
        user_id: &UserId,
        connection_id: ConnectionId,
    ) -> Result<(), ConnectionRegistryError>;

    /// True if the user has at least one channel.
    async fn is_connected(&self, user_id: &UserId) -> bool;

    /// Number of channels the user holds.
    async fn connection_count(&self, user_id: &UserId) -> usize;

    /// Push an event to every channel of the user.
    ///
    /// Returns how many channels accepted it; `Ok(0)` when the user has
    /// no channels at all.
    ///
    /// # Errors
    ///
    /// - `DeliveryFailed` if channels exist but every one rejected the event
    async fn publish(
        &self,
        user_id: &UserId,
        event: LiveEvent,
    ) -> Result<usize, ConnectionRegistryError>;

    /// Drop every channel. Returns how many were removed.
    async fn clear(&self) -> usize;
}
