//! In-process connection registry for live notification channels.
//!
//! ```text
//! user: alice          user: bob
//! ├── conn-1 (tab)     └── conn-3
//! └── conn-2 (phone)
//! ```
//!
//! Each connection owns a bounded mpsc queue drained by its socket task.
//! `publish` uses `try_send`, so a stalled client can lose events but never
//! blocks the dispatcher; order within one queue is preserved.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};

use crate::domain::foundation::UserId;
use crate::ports::{
    ConnectionId, ConnectionRegistry, ConnectionRegistryError, LiveEvent, LiveSender,
};

/// Default per-connection queue size.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

pub struct InMemoryConnectionRegistry {
    channels: RwLock<HashMap<UserId, Vec<(ConnectionId, LiveSender)>>>,
    channel_capacity: usize,
}

impl InMemoryConnectionRegistry {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            channel_capacity: channel_capacity.max(2),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a queue sized for this registry and register its sender.
    pub async fn open(&self, user_id: &UserId) -> (ConnectionId, mpsc::Receiver<LiveEvent>) {
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let id = self.register(user_id, tx).await;
        (id, rx)
    }

    /// Total channels across all users.
    pub async fn total_connections(&self) -> usize {
        self.channels.read().await.values().map(Vec::len).sum()
    }

    async fn prune(&self, user_id: &UserId, dead: &[ConnectionId]) {
        let mut channels = self.channels.write().await;
        if let Some(list) = channels.get_mut(user_id) {
            list.retain(|(id, _)| !dead.contains(id));
            if list.is_empty() {
                channels.remove(user_id);
            }
        }
    }
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, user_id: &UserId, sender: LiveSender) -> ConnectionId {
        let id = ConnectionId::new();
        self.channels
            .write()
            .await
            .entry(user_id.clone())
            .or_default()
            .push((id, sender));
        tracing::debug!(user_id = %user_id, connection_id = %id, "live channel registered");
        id
    }

    async fn unregister(
        &self,
        user_id: &UserId,
        connection_id: ConnectionId,
    ) -> Result<(), ConnectionRegistryError> {
        let mut channels = self.channels.write().await;
        let not_found = || ConnectionRegistryError::NotFound {
            user_id: user_id.to_string(),
            connection_id,
        };
        let list = channels.get_mut(user_id).ok_or_else(not_found)?;
        let before = list.len();
        list.retain(|(id, _)| *id != connection_id);
        if list.len() == before {
            return Err(not_found());
        }
        if list.is_empty() {
            channels.remove(user_id);
        }
        tracing::debug!(user_id = %user_id, connection_id = %connection_id, "live channel removed");
        Ok(())
    }

    async fn is_connected(&self, user_id: &UserId) -> bool {
        self.channels
            .read()
            .await
            .get(user_id)
            .is_some_and(|list| !list.is_empty())
    }

    async fn connection_count(&self, user_id: &UserId) -> usize {
        self.channels.read().await.get(user_id).map_or(0, Vec::len)
    }

    async fn publish(
        &self,
        user_id: &UserId,
        event: LiveEvent,
    ) -> Result<usize, ConnectionRegistryError> {
        let targets: Vec<(ConnectionId, LiveSender)> = match self.channels.read().await.get(user_id) {
            Some(list) => list.clone(),
            None => return Ok(0),
        };

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, sender) in &targets {
            match sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(user_id = %user_id, connection_id = %id, event = event.name(), "live channel full, event dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => dead.push(*id),
            }
        }
        if !dead.is_empty() {
            self.prune(user_id, &dead).await;
        }

        if delivered == 0 && !targets.is_empty() {
            return Err(ConnectionRegistryError::DeliveryFailed {
                user_id: user_id.to_string(),
                attempted: targets.len(),
            });
        }
        Ok(delivered)
    }

    async fn clear(&self) -> usize {
        let mut channels = self.channels.write().await;
        let removed = channels.values().map(Vec::len).sum();
        channels.clear();
        tracing::info!(removed, "connection registry cleared");
        removed
    }
}
