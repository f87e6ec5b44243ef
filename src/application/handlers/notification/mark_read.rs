//! MarkReadHandler - mark some or all of the caller's notifications read.

use std::sync::Arc;

use crate::application::NotificationDispatcher;
use crate::domain::foundation::CommandMetadata;
use crate::domain::notification::{NotificationError, ReadSelection};
use crate::ports::NotificationRepository;

#[derive(Debug, Clone)]
pub struct MarkReadCommand {
    pub selection: ReadSelection,
}

pub struct MarkReadHandler {
    notifications: Arc<dyn NotificationRepository>,
    dispatcher: NotificationDispatcher,
}

impl MarkReadHandler {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            notifications,
            dispatcher,
        }
    }

    /// Returns how many notifications changed state. An empty id list is a
    /// validation error; an unknown or foreign id fails the whole call.
    pub async fn handle(
        &self,
        cmd: MarkReadCommand,
        metadata: CommandMetadata,
    ) -> Result<u64, NotificationError> {
        if let ReadSelection::Ids(ids) = &cmd.selection {
            if ids.is_empty() {
                return Err(NotificationError::validation(
                    "ids",
                    "At least one notification id is required",
                ));
            }
        }

        let changed = self
            .notifications
            .mark_read(&metadata.user_id, &cmd.selection)
            .await?;
        if changed > 0 {
            self.dispatcher.refresh_unread_count(&metadata.user_id).await;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{as_user, user, World};
    use crate::application::NotificationDraft;
    use crate::domain::foundation::NotificationId;
    use crate::domain::notification::NotificationKind;
    use crate::ports::LiveEvent;

    async fn send(w: &World, who: &str) -> NotificationId {
        let draft = NotificationDraft::new(NotificationKind::Reminder, "ping", "");
        *w.dispatcher
            .dispatch(&user(who), draft)
            .await
            .unwrap()
            .notification
            .id()
    }

    fn handler(w: &World) -> MarkReadHandler {
        MarkReadHandler::new(w.notifications.clone(), w.dispatcher.clone())
    }

    #[tokio::test]
    async fn marking_ids_pushes_new_unread_count() {
        let w = World::new();
        let first = send(&w, "ed").await;
        send(&w, "ed").await;
        let (_conn, mut rx) = w.registry.open(&user("ed")).await;

        let changed = handler(&w)
            .handle(
                MarkReadCommand {
                    selection: ReadSelection::Ids(vec![first]),
                },
                as_user("ed"),
            )
            .await
            .unwrap();

        assert_eq!(changed, 1);
        assert_eq!(rx.recv().await.unwrap(), LiveEvent::UnreadCount { count: 1 });
    }

    #[tokio::test]
    async fn mark_all_clears_unread() {
        let w = World::new();
        send(&w, "ed").await;
        send(&w, "ed").await;
        let changed = handler(&w)
            .handle(
                MarkReadCommand {
                    selection: ReadSelection::All,
                },
                as_user("ed"),
            )
            .await
            .unwrap();
        assert_eq!(changed, 2);
        assert_eq!(w.notifications.count_unread(&user("ed")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn foreign_id_is_not_found_and_changes_nothing() {
        let w = World::new();
        let own = send(&w, "ed").await;
        let foreign = send(&w, "vi").await;

        let err = handler(&w)
            .handle(
                MarkReadCommand {
                    selection: ReadSelection::Ids(vec![own, foreign]),
                },
                as_user("ed"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, NotificationError::NotFound(_)));
        assert_eq!(w.notifications.count_unread(&user("ed")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_id_list_is_rejected() {
        let w = World::new();
        let err = handler(&w)
            .handle(
                MarkReadCommand {
                    selection: ReadSelection::Ids(Vec::new()),
                },
                as_user("ed"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::ValidationFailed { .. }));
    }
}
