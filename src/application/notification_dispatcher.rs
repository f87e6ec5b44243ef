//! Notification dispatcher - persist, then push live when possible.
//!
//! `dispatch` writes the record first (`delivered = false`), then, if the
//! recipient has a live channel, pushes `notification.new` followed by
//! `notification.unread_count` and flips `delivered`. No backlog is kept for
//! offline recipients.
//!
//! `fan_out` resolves a role group and dispatches to every member in its own
//! task. A member's failure or panic is logged and counted, never returned.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::domain::foundation::{DomainError, RoleGroup, UserId};
use crate::domain::notification::{DispatchOptions, Notification, NotificationKind};
use crate::ports::{ConnectionRegistry, LiveEvent, NotificationRepository, UserDirectory};

/// Default cap on concurrently running fan-out tasks.
pub const DEFAULT_FANOUT_CONCURRENCY: usize = 32;

/// Everything about a notification except its recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub options: DispatchOptions,
}

impl NotificationDraft {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            options: DispatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }
}

/// Result of one dispatch.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub notification: Notification,
    pub unread_count: Option<u64>,
    pub delivered: bool,
}

/// Tally of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub recipients: usize,
    pub persisted: usize,
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    directory: Arc<dyn UserDirectory>,
    fanout_concurrency: usize,
}

impl NotificationDispatcher {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            notifications,
            registry,
            directory,
            fanout_concurrency: DEFAULT_FANOUT_CONCURRENCY,
        }
    }

    pub fn with_fanout_concurrency(mut self, limit: usize) -> Self {
        self.fanout_concurrency = limit.max(1);
        self
    }

    /// Persist a notification and push it live if the recipient is connected.
    ///
    /// # Errors
    ///
    /// Only persistence of the record itself fails the call. Live push
    /// problems leave `delivered = false` and are logged.
    pub async fn dispatch(
        &self,
        recipient: &UserId,
        draft: NotificationDraft,
    ) -> Result<DispatchOutcome, DomainError> {
        let mut notification = Notification::new(
            recipient.clone(),
            draft.kind,
            draft.title,
            draft.message,
            draft.options,
        )?;
        self.notifications.create(&notification).await?;

        let unread_count = match self.notifications.count_unread(recipient).await {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(recipient_id = %recipient, error = %e, "unread count unavailable, skipping live push");
                None
            }
        };

        let mut delivered = false;
        if let Some(count) = unread_count {
            if self.registry.is_connected(recipient).await {
                delivered = self.push(recipient, &notification, count).await;
            }
        }

        if delivered {
            match self.notifications.mark_delivered(notification.id()).await {
                Ok(()) => notification.mark_delivered(),
                Err(e) => {
                    tracing::warn!(notification_id = %notification.id(), error = %e, "failed to record delivery");
                }
            }
        }

        tracing::debug!(
            recipient_id = %recipient,
            notification_id = %notification.id(),
            kind = %notification.kind(),
            delivered,
            "notification dispatched"
        );
        Ok(DispatchOutcome {
            notification,
            unread_count,
            delivered,
        })
    }

    /// `dispatch` for workflow side effects: failures are logged and dropped.
    pub async fn notify(&self, recipient: &UserId, draft: NotificationDraft) -> Option<DispatchOutcome> {
        match self.dispatch(recipient, draft).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(recipient_id = %recipient, error = %e, "notification dispatch failed");
                None
            }
        }
    }

    /// Dispatch to every current member of `group`, concurrently.
    ///
    /// Zero members persists nothing. Never fails.
    pub async fn fan_out(&self, group: RoleGroup, draft: NotificationDraft) -> FanOutReport {
        let members = match self.directory.members(group).await {
            Ok(members) => members,
            Err(e) => {
                tracing::warn!(group = %group, error = %e, "could not resolve role group, fan-out skipped");
                return FanOutReport::default();
            }
        };

        let mut report = FanOutReport {
            recipients: members.len(),
            ..FanOutReport::default()
        };
        if members.is_empty() {
            return report;
        }

        let permits = Arc::new(Semaphore::new(self.fanout_concurrency));
        let mut tasks = JoinSet::new();
        for member in members {
            let dispatcher = self.clone();
            let draft = draft.clone();
            let permits = Arc::clone(&permits);
            let span = tracing::debug_span!("fan_out_member", recipient_id = %member);
            tasks.spawn(
                async move {
                    let _permit = permits.acquire_owned().await.ok();
                    dispatcher
                        .dispatch(&member, draft)
                        .await
                        .map(|outcome| outcome.delivered)
                        .map_err(|e| (member, e))
                }
                .instrument(span),
            );
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(delivered)) => {
                    report.persisted += 1;
                    if delivered {
                        report.delivered += 1;
                    }
                }
                Ok(Err((member, e))) => {
                    report.failed += 1;
                    tracing::warn!(group = %group, recipient_id = %member, error = %e, "fan-out dispatch failed");
                }
                Err(join_error) => {
                    report.failed += 1;
                    tracing::error!(group = %group, error = %join_error, "fan-out task aborted");
                }
            }
        }

        tracing::info!(
            group = %group,
            recipients = report.recipients,
            persisted = report.persisted,
            delivered = report.delivered,
            failed = report.failed,
            "fan-out complete"
        );
        report
    }

    /// Re-push the current unread count after the recipient changed it.
    pub async fn refresh_unread_count(&self, recipient: &UserId) {
        let count = match self.notifications.count_unread(recipient).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(recipient_id = %recipient, error = %e, "unread count unavailable");
                return;
            }
        };
        if let Err(e) = self
            .registry
            .publish(recipient, LiveEvent::UnreadCount { count })
            .await
        {
            tracing::debug!(recipient_id = %recipient, error = %e, "unread count push failed");
        }
    }

    /// Both events go to the same channels, in order.
    async fn push(&self, recipient: &UserId, notification: &Notification, count: u64) -> bool {
        let created = self
            .registry
            .publish(recipient, LiveEvent::NotificationCreated(notification.clone()))
            .await;
        match created {
            Ok(0) => false,
            Ok(_) => match self
                .registry
                .publish(recipient, LiveEvent::UnreadCount { count })
                .await
            {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!(recipient_id = %recipient, error = %e, "unread count push failed");
                    false
                }
            },
            Err(e) => {
                tracing::warn!(recipient_id = %recipient, error = %e, "live push failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryNotificationRepository, InMemoryUserDirectory};
    use crate::adapters::websocket::InMemoryConnectionRegistry;
    use crate::domain::foundation::{ErrorCode, NotificationId, Role};
    use crate::domain::notification::{NotificationPage, PageRequest, ReadSelection};
    use crate::ports::UserRecord;
    use async_trait::async_trait;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn directory(users: &[(&str, Role)]) -> Arc<InMemoryUserDirectory> {
        Arc::new(InMemoryUserDirectory::from_records(
            users
                .iter()
                .map(|(id, role)| UserRecord::new(user(id), *id, *role)),
        ))
    }

    struct Fixture {
        notifications: Arc<InMemoryNotificationRepository>,
        registry: Arc<InMemoryConnectionRegistry>,
        dispatcher: NotificationDispatcher,
    }

    fn fixture(users: &[(&str, Role)]) -> Fixture {
        let notifications = Arc::new(InMemoryNotificationRepository::new());
        let registry = Arc::new(InMemoryConnectionRegistry::with_default_capacity());
        let dispatcher =
            NotificationDispatcher::new(notifications.clone(), registry.clone(), directory(users));
        Fixture {
            notifications,
            registry,
            dispatcher,
        }
    }

    fn draft() -> NotificationDraft {
        NotificationDraft::new(NotificationKind::Submitted, "New edit", "Please review")
    }

    #[tokio::test]
    async fn offline_recipient_gets_persisted_undelivered_record() {
        let f = fixture(&[]);
        let outcome = f.dispatcher.dispatch(&user("amy"), draft()).await.unwrap();

        assert!(!outcome.delivered);
        assert_eq!(outcome.unread_count, Some(1));
        let stored = f.notifications.all().await;
        assert_eq!(stored.len(), 1);
        assert!(!stored[0].delivered());
        assert!(!stored[0].is_read());
    }

    #[tokio::test]
    async fn online_recipient_gets_new_then_count_and_is_marked_delivered() {
        let f = fixture(&[]);
        let (_conn, mut rx) = f.registry.open(&user("amy")).await;

        let outcome = f.dispatcher.dispatch(&user("amy"), draft()).await.unwrap();
        assert!(outcome.delivered);

        match rx.recv().await {
            Some(LiveEvent::NotificationCreated(n)) => assert_eq!(n.id(), outcome.notification.id()),
            other => panic!("expected notification first, got {:?}", other),
        }
        assert_eq!(rx.recv().await, Some(LiveEvent::UnreadCount { count: 1 }));
        assert!(f.notifications.all().await[0].delivered());
    }

    #[tokio::test]
    async fn fan_out_to_empty_group_persists_nothing() {
        let f = fixture(&[("ed", Role::Editor)]);
        let report = f.dispatcher.fan_out(RoleGroup::Reviewers, draft()).await;

        assert_eq!(report, FanOutReport::default());
        assert_eq!(f.notifications.len().await, 0);
    }

    #[tokio::test]
    async fn fan_out_reaches_every_member() {
        let f = fixture(&[
            ("v1", Role::Viewer),
            ("v2", Role::Viewer),
            ("v3", Role::Viewer),
            ("ed", Role::Editor),
        ]);
        let (_c, mut rx) = f.registry.open(&user("v2")).await;

        let report = f.dispatcher.fan_out(RoleGroup::Viewers, draft()).await;
        assert_eq!(report.recipients, 3);
        assert_eq!(report.persisted, 3);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 0);
        assert!(matches!(rx.recv().await, Some(LiveEvent::NotificationCreated(_))));
    }

    /// Fails (or panics) for one recipient, delegates otherwise.
    struct FlakyRepository {
        inner: InMemoryNotificationRepository,
        fail_for: UserId,
        panic_for: UserId,
    }

    #[async_trait]
    impl NotificationRepository for FlakyRepository {
        async fn create(&self, n: &Notification) -> Result<(), DomainError> {
            if n.recipient_id() == &self.fail_for {
                return Err(DomainError::new(ErrorCode::DatabaseError, "disk full"));
            }
            if n.recipient_id() == &self.panic_for {
                panic!("driver bug");
            }
            self.inner.create(n).await
        }
        async fn list_by_recipient(
            &self,
            r: &UserId,
            p: PageRequest,
            u: bool,
        ) -> Result<NotificationPage, DomainError> {
            self.inner.list_by_recipient(r, p, u).await
        }
        async fn count_unread(&self, r: &UserId) -> Result<u64, DomainError> {
            self.inner.count_unread(r).await
        }
        async fn mark_read(&self, r: &UserId, s: &ReadSelection) -> Result<u64, DomainError> {
            self.inner.mark_read(r, s).await
        }
        async fn mark_delivered(&self, id: &NotificationId) -> Result<(), DomainError> {
            self.inner.mark_delivered(id).await
        }
        async fn delete(&self, r: &UserId, id: &NotificationId) -> Result<(), DomainError> {
            self.inner.delete(r, id).await
        }
        async fn delete_all(&self, r: &UserId) -> Result<u64, DomainError> {
            self.inner.delete_all(r).await
        }
    }

    #[tokio::test]
    async fn one_member_failing_does_not_affect_siblings() {
        let inner = InMemoryNotificationRepository::new();
        let repo = Arc::new(FlakyRepository {
            inner: inner.clone(),
            fail_for: user("v2"),
            panic_for: user("v3"),
        });
        let dispatcher = NotificationDispatcher::new(
            repo,
            Arc::new(InMemoryConnectionRegistry::with_default_capacity()),
            directory(&[
                ("v1", Role::Viewer),
                ("v2", Role::Viewer),
                ("v3", Role::Viewer),
                ("v4", Role::Viewer),
            ]),
        )
        .with_fanout_concurrency(2);

        let report = dispatcher.fan_out(RoleGroup::Viewers, draft()).await;

        assert_eq!(report.recipients, 4);
        assert_eq!(report.persisted, 2);
        assert_eq!(report.failed, 2);
        let recipients: Vec<_> = inner
            .all()
            .await
            .iter()
            .map(|n| n.recipient_id().to_string())
            .collect();
        assert!(recipients.contains(&"v1".to_string()));
        assert!(recipients.contains(&"v4".to_string()));
    }

    #[tokio::test]
    async fn notify_swallows_errors() {
        let f = fixture(&[]);
        let bad = NotificationDraft::new(NotificationKind::Reminder, "", "no title");
        assert!(f.dispatcher.notify(&user("amy"), bad).await.is_none());
    }

    #[tokio::test]
    async fn refresh_pushes_current_count() {
        let f = fixture(&[]);
        f.dispatcher.dispatch(&user("amy"), draft()).await.unwrap();
        let (_c, mut rx) = f.registry.open(&user("amy")).await;

        f.dispatcher.refresh_unread_count(&user("amy")).await;
        assert_eq!(rx.recv().await, Some(LiveEvent::UnreadCount { count: 1 }));
    }
}
