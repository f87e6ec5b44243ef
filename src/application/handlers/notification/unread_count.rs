use std::sync::Arc;

use crate::domain::foundation::CommandMetadata;
use crate::domain::notification::NotificationError;
use crate::ports::NotificationRepository;

pub struct UnreadCountHandler {
    notifications: Arc<dyn NotificationRepository>,
}

impl UnreadCountHandler {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    pub async fn handle(&self, metadata: CommandMetadata) -> Result<u64, NotificationError> {
        Ok(self.notifications.count_unread(&metadata.user_id).await?)
    }
}
