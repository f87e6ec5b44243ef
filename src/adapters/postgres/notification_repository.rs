//! PostgreSQL implementation of NotificationRepository.
//!
//! Every recipient-side statement carries `recipient_id` in its WHERE
//! clause, so a foreign id affects no rows and reads as not found.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{postgres::PgRow, types::Json, PgPool};
use uuid::Uuid;

use crate::domain::foundation::{
    DocumentId, DomainError, ErrorCode, NotificationId, ProposalId, Timestamp, UserId,
};
use crate::domain::notification::{
    DispatchOptions, Notification, NotificationPage, PageRequest, ReadSelection,
};
use crate::ports::NotificationRepository;

use super::{column, db_error, parse_column};

#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn not_found(id: &NotificationId) -> DomainError {
    DomainError::not_found(ErrorCode::NotificationNotFound, "notification", id)
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, recipient_id, kind, actor_id, document_id, proposal_id,
                title, message, metadata, is_read, delivered, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(notification.id().as_uuid())
        .bind(notification.recipient_id().as_str())
        .bind(notification.kind().as_str())
        .bind(notification.actor_id().map(UserId::as_str))
        .bind(notification.document_id().map(|id| *id.as_uuid()))
        .bind(notification.proposal_id().map(|id| *id.as_uuid()))
        .bind(notification.title())
        .bind(notification.message())
        .bind(Json(notification.metadata()))
        .bind(notification.is_read())
        .bind(notification.delivered())
        .bind(notification.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert notification"))?;

        Ok(())
    }

    async fn list_by_recipient(
        &self,
        recipient: &UserId,
        page: PageRequest,
        unread_only: bool,
    ) -> Result<NotificationPage, DomainError> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM notifications
            WHERE recipient_id = $1 AND ($2 = FALSE OR is_read = FALSE)
            "#,
        )
        .bind(recipient.as_str())
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count notifications"))?;

        let offset = i64::try_from(page.offset())
            .map_err(|_| DomainError::validation("page", "Page out of range"))?;
        let rows = sqlx::query(
            r#"
            SELECT id, recipient_id, kind, actor_id, document_id, proposal_id,
                   title, message, metadata, is_read, delivered, created_at
            FROM notifications
            WHERE recipient_id = $1 AND ($2 = FALSE OR is_read = FALSE)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(recipient.as_str())
        .bind(unread_only)
        .bind(i64::from(page.limit()))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list notifications"))?;

        let items = rows
            .into_iter()
            .map(row_to_notification)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NotificationPage::new(items, page, total.max(0) as u64))
    }

    async fn count_unread(&self, recipient: &UserId) -> Result<u64, DomainError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count unread notifications"))?;

        Ok(count.max(0) as u64)
    }

    async fn mark_read(
        &self,
        recipient: &UserId,
        selection: &ReadSelection,
    ) -> Result<u64, DomainError> {
        match selection {
            ReadSelection::All => {
                let result = sqlx::query(
                    "UPDATE notifications SET is_read = TRUE WHERE recipient_id = $1 AND is_read = FALSE",
                )
                .bind(recipient.as_str())
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to mark notifications read"))?;
                Ok(result.rows_affected())
            }
            ReadSelection::Ids(ids) => {
                let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
                let mut tx = self
                    .pool
                    .begin()
                    .await
                    .map_err(db_error("Failed to begin transaction"))?;

                // All ids must belong to the recipient before anything changes.
                let owned: Vec<(Uuid, bool)> = sqlx::query_as(
                    r#"
                    SELECT id, is_read FROM notifications
                    WHERE recipient_id = $1 AND id = ANY($2)
                    FOR UPDATE
                    "#,
                )
                .bind(recipient.as_str())
                .bind(&uuids)
                .fetch_all(&mut *tx)
                .await
                .map_err(db_error("Failed to lock notifications"))?;

                if let Some(missing) = ids
                    .iter()
                    .find(|id| !owned.iter().any(|(owned_id, _)| owned_id == id.as_uuid()))
                {
                    return Err(not_found(missing));
                }

                let result = sqlx::query(
                    r#"
                    UPDATE notifications SET is_read = TRUE
                    WHERE recipient_id = $1 AND id = ANY($2) AND is_read = FALSE
                    "#,
                )
                .bind(recipient.as_str())
                .bind(&uuids)
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to mark notifications read"))?;

                tx.commit()
                    .await
                    .map_err(db_error("Failed to commit mark-read"))?;
                Ok(result.rows_affected())
            }
        }
    }

    async fn mark_delivered(&self, id: &NotificationId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE notifications SET delivered = TRUE WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to mark notification delivered"))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn delete(&self, recipient: &UserId, id: &NotificationId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
            .bind(id.as_uuid())
            .bind(recipient.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete notification"))?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn delete_all(&self, recipient: &UserId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM notifications WHERE recipient_id = $1")
            .bind(recipient.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to clear notifications"))?;

        Ok(result.rows_affected())
    }
}

fn row_to_notification(row: PgRow) -> Result<Notification, DomainError> {
    let id: Uuid = column(&row, "id")?;
    let recipient: String = column(&row, "recipient_id")?;
    let kind: String = column(&row, "kind")?;
    let actor: Option<String> = column(&row, "actor_id")?;
    let document_id: Option<Uuid> = column(&row, "document_id")?;
    let proposal_id: Option<Uuid> = column(&row, "proposal_id")?;
    let Json(metadata): Json<Map<String, Value>> = column(&row, "metadata")?;
    let created_at: DateTime<Utc> = column(&row, "created_at")?;

    let options = DispatchOptions {
        actor_id: actor.map(UserId::new).transpose()?,
        document_id: document_id.map(DocumentId::from_uuid),
        proposal_id: proposal_id.map(ProposalId::from_uuid),
        metadata,
    };

    Ok(Notification::reconstitute(
        NotificationId::from_uuid(id),
        UserId::new(recipient)?,
        parse_column("kind", &kind)?,
        options,
        column(&row, "title")?,
        column(&row, "message")?,
        column(&row, "is_read")?,
        column(&row, "delivered")?,
        Timestamp::from_datetime(created_at),
    ))
}
