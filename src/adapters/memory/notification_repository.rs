//! In-memory notification store.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, NotificationId, UserId};
use crate::domain::notification::{Notification, NotificationPage, PageRequest, ReadSelection};
use crate::ports::NotificationRepository;

/// Notifications kept in insertion order; listings walk it backwards.
#[derive(Clone, Default)]
pub struct InMemoryNotificationRepository {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored notification, oldest first.
    pub async fn all(&self) -> Vec<Notification> {
        self.notifications.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.notifications.read().await.len()
    }
}

fn not_found(id: &NotificationId) -> DomainError {
    DomainError::not_found(ErrorCode::NotificationNotFound, "notification", id)
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<(), DomainError> {
        self.notifications.write().await.push(notification.clone());
        Ok(())
    }

    async fn list_by_recipient(
        &self,
        recipient: &UserId,
        page: PageRequest,
        unread_only: bool,
    ) -> Result<NotificationPage, DomainError> {
        let notifications = self.notifications.read().await;
        let matching: Vec<&Notification> = notifications
            .iter()
            .rev()
            .filter(|n| n.belongs_to(recipient) && (!unread_only || !n.is_read()))
            .collect();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .cloned()
            .collect();
        Ok(NotificationPage::new(items, page, total))
    }

    async fn count_unread(&self, recipient: &UserId) -> Result<u64, DomainError> {
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .filter(|n| n.belongs_to(recipient) && !n.is_read())
            .count() as u64)
    }

    async fn mark_read(
        &self,
        recipient: &UserId,
        selection: &ReadSelection,
    ) -> Result<u64, DomainError> {
        let mut notifications = self.notifications.write().await;
        let mut changed = 0;
        match selection {
            ReadSelection::All => {
                for n in notifications.iter_mut().filter(|n| n.belongs_to(recipient)) {
                    if !n.is_read() {
                        n.mark_read();
                        changed += 1;
                    }
                }
            }
            ReadSelection::Ids(ids) => {
                // Validate ownership of every id before touching any.
                for id in ids {
                    if !notifications
                        .iter()
                        .any(|n| n.id() == id && n.belongs_to(recipient))
                    {
                        return Err(not_found(id));
                    }
                }
                for n in notifications.iter_mut() {
                    if ids.contains(n.id()) && !n.is_read() {
                        n.mark_read();
                        changed += 1;
                    }
                }
            }
        }
        Ok(changed)
    }

    async fn mark_delivered(&self, id: &NotificationId) -> Result<(), DomainError> {
        let mut notifications = self.notifications.write().await;
        let n = notifications
            .iter_mut()
            .find(|n| n.id() == id)
            .ok_or_else(|| not_found(id))?;
        n.mark_delivered();
        Ok(())
    }

    async fn delete(&self, recipient: &UserId, id: &NotificationId) -> Result<(), DomainError> {
        let mut notifications = self.notifications.write().await;
        let idx = notifications
            .iter()
            .position(|n| n.id() == id && n.belongs_to(recipient))
            .ok_or_else(|| not_found(id))?;
        notifications.remove(idx);
        Ok(())
    }

    async fn delete_all(&self, recipient: &UserId) -> Result<u64, DomainError> {
        let mut notifications = self.notifications.write().await;
        let before = notifications.len();
        notifications.retain(|n| !n.belongs_to(recipient));
        Ok((before - notifications.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::{DispatchOptions, NotificationKind};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn note(to: &str, title: &str) -> Notification {
        Notification::new(
            user(to),
            NotificationKind::Reminder,
            title,
            "",
            DispatchOptions::default(),
        )
        .unwrap()
    }

    fn page(p: u32, l: u32) -> PageRequest {
        PageRequest::new(p, l, 100).unwrap()
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_paginated() {
        let repo = InMemoryNotificationRepository::new();
        for i in 0..5 {
            repo.create(&note("amy", &format!("n{}", i))).await.unwrap();
        }
        repo.create(&note("bob", "other")).await.unwrap();

        let first = repo.list_by_recipient(&user("amy"), page(1, 2), false).await.unwrap();
        assert_eq!(first.total, 5);
        assert_eq!(first.pages, 3);
        let titles: Vec<_> = first.items.iter().map(|n| n.title()).collect();
        assert_eq!(titles, vec!["n4", "n3"]);

        let last = repo.list_by_recipient(&user("amy"), page(3, 2), false).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].title(), "n0");
    }

    #[tokio::test]
    async fn mark_read_by_other_recipient_is_not_found_and_changes_nothing() {
        let repo = InMemoryNotificationRepository::new();
        let mine = note("amy", "mine");
        let theirs = note("bob", "theirs");
        repo.create(&mine).await.unwrap();
        repo.create(&theirs).await.unwrap();

        let err = repo
            .mark_read(&user("amy"), &ReadSelection::Ids(vec![*mine.id(), *theirs.id()]))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotificationNotFound);
        assert_eq!(repo.count_unread(&user("amy")).await.unwrap(), 1);
        assert_eq!(repo.count_unread(&user("bob")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn mark_all_read_only_touches_recipient() {
        let repo = InMemoryNotificationRepository::new();
        repo.create(&note("amy", "a")).await.unwrap();
        repo.create(&note("amy", "b")).await.unwrap();
        repo.create(&note("bob", "c")).await.unwrap();

        let changed = repo.mark_read(&user("amy"), &ReadSelection::All).await.unwrap();
        assert_eq!(changed, 2);
        assert_eq!(repo.count_unread(&user("amy")).await.unwrap(), 0);
        assert_eq!(repo.count_unread(&user("bob")).await.unwrap(), 1);

        let unread = repo.list_by_recipient(&user("amy"), page(1, 20), true).await.unwrap();
        assert!(unread.items.is_empty());
    }

    #[tokio::test]
    async fn delete_is_scoped_to_recipient() {
        let repo = InMemoryNotificationRepository::new();
        let n = note("amy", "a");
        repo.create(&n).await.unwrap();

        let err = repo.delete(&user("bob"), n.id()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotificationNotFound);
        repo.delete(&user("amy"), n.id()).await.unwrap();
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn delete_all_returns_count() {
        let repo = InMemoryNotificationRepository::new();
        repo.create(&note("amy", "a")).await.unwrap();
        repo.create(&note("amy", "b")).await.unwrap();
        repo.create(&note("bob", "c")).await.unwrap();
        assert_eq!(repo.delete_all(&user("amy")).await.unwrap(), 2);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn mark_delivered_sets_flag() {
        let repo = InMemoryNotificationRepository::new();
        let n = note("amy", "a");
        repo.create(&n).await.unwrap();
        repo.mark_delivered(n.id()).await.unwrap();
        assert!(repo.all().await[0].delivered());
    }
}
