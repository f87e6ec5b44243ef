//! Notification repository port.
//!
//! Every recipient-side operation is scoped by recipient: a notification
//! owned by someone else behaves exactly like a missing one.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, NotificationId, UserId};
use crate::domain::notification::{Notification, NotificationPage, PageRequest, ReadSelection};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<(), DomainError>;

    /// One page of the recipient's notifications, newest first.
    async fn list_by_recipient(
        &self,
        recipient: &UserId,
        page: PageRequest,
        unread_only: bool,
    ) -> Result<NotificationPage, DomainError>;

    async fn count_unread(&self, recipient: &UserId) -> Result<u64, DomainError>;

    /// Mark notifications read. Returns how many changed state.
    ///
    /// # Errors
    ///
    /// - `NotificationNotFound` if any listed id is missing or belongs to
    ///   another recipient; nothing is changed in that case
    async fn mark_read(
        &self,
        recipient: &UserId,
        selection: &ReadSelection,
    ) -> Result<u64, DomainError>;

    /// Record a successful live push.
    async fn mark_delivered(&self, id: &NotificationId) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `NotificationNotFound` if missing or owned by another recipient
    async fn delete(&self, recipient: &UserId, id: &NotificationId) -> Result<(), DomainError>;

    /// Delete every notification of the recipient. Returns how many.
    async fn delete_all(&self, recipient: &UserId) -> Result<u64, DomainError>;
}
