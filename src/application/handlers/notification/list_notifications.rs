//! ListNotificationsHandler - paged inbox, newest first.

use std::sync::Arc;

use crate::domain::foundation::CommandMetadata;
use crate::domain::notification::{NotificationError, NotificationPage, PageRequest};
use crate::ports::NotificationRepository;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct ListNotificationsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub unread_only: bool,
}

pub struct ListNotificationsHandler {
    notifications: Arc<dyn NotificationRepository>,
    default_page_size: u32,
    max_page_size: u32,
}

impl ListNotificationsHandler {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self {
            notifications,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_page_sizes(mut self, default_page_size: u32, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size.max(1);
        self.default_page_size = default_page_size.clamp(1, self.max_page_size);
        self
    }

    pub async fn handle(
        &self,
        query: ListNotificationsQuery,
        metadata: CommandMetadata,
    ) -> Result<NotificationPage, NotificationError> {
        let request = PageRequest::new(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(self.default_page_size),
            self.max_page_size,
        )?;
        Ok(self
            .notifications
            .list_by_recipient(&metadata.user_id, request, query.unread_only)
            .await?)
    }
}
