//! DeleteNotificationsHandler - remove one or all of the caller's notifications.

use std::sync::Arc;

use crate::application::NotificationDispatcher;
use crate::domain::foundation::{CommandMetadata, NotificationId};
use crate::domain::notification::NotificationError;
use crate::ports::NotificationRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteNotificationsCommand {
    One(NotificationId),
    All,
}

pub struct DeleteNotificationsHandler {
    notifications: Arc<dyn NotificationRepository>,
    dispatcher: NotificationDispatcher,
}

impl DeleteNotificationsHandler {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            notifications,
            dispatcher,
        }
    }

    /// Returns how many notifications were removed.
    pub async fn handle(
        &self,
        cmd: DeleteNotificationsCommand,
        metadata: CommandMetadata,
    ) -> Result<u64, NotificationError> {
        let removed = match cmd {
            DeleteNotificationsCommand::One(id) => {
                self.notifications.delete(&metadata.user_id, &id).await?;
                1
            }
            DeleteNotificationsCommand::All => {
                self.notifications.delete_all(&metadata.user_id).await?
            }
        };
        if removed > 0 {
            self.dispatcher.refresh_unread_count(&metadata.user_id).await;
        }
        Ok(removed)
    }
}
