//! PostgreSQL implementation of DocumentRepository.
//!
//! `mutate` runs inside a transaction holding `SELECT ... FOR UPDATE` on
//! the document row, so concurrent mutations from any process serialise on
//! the database. Version rows are only ever inserted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::document::{Document, DocumentFilter, VersionEntry};
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{DocumentMutation, DocumentRepository};

use super::{column, db_error};

#[derive(Clone)]
pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_versions<'e, E>(executor: E, id: &Uuid) -> Result<Vec<VersionEntry>, DomainError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query(
            r#"
            SELECT content, editor_id, created_at
            FROM document_versions
            WHERE document_id = $1
            ORDER BY seq
            "#,
        )
        .bind(id)
        .fetch_all(executor)
        .await
        .map_err(db_error("Failed to fetch document versions"))?;

        rows.into_iter().map(row_to_version).collect()
    }

    async fn insert_versions(
        tx: &mut Transaction<'_, Postgres>,
        id: &Uuid,
        first_seq: usize,
        entries: &[VersionEntry],
    ) -> Result<(), DomainError> {
        for (offset, entry) in entries.iter().enumerate() {
            let seq = i32::try_from(first_seq + offset)
                .map_err(|_| DomainError::database("Version sequence", "overflow"))?;
            sqlx::query(
                r#"
                INSERT INTO document_versions (document_id, seq, content, editor_id, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(id)
            .bind(seq)
            .bind(&entry.content)
            .bind(entry.editor.as_str())
            .bind(entry.timestamp.as_datetime())
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to insert document version"))?;
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn create(&self, document: &Document) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO documents (id, title, author_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(document.id().as_uuid())
        .bind(document.title())
        .bind(document.author().as_str())
        .bind(document.content())
        .bind(document.created_at().as_datetime())
        .bind(document.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to insert document"))?;

        Self::insert_versions(&mut tx, document.id().as_uuid(), 0, document.versions()).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit document"))
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Document>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, author_id, content, created_at, updated_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch document"))?;

        match row {
            Some(row) => {
                let versions = Self::load_versions(&self.pool, id.as_uuid()).await?;
                Ok(Some(row_to_document(row, versions)?))
            }
            None => Ok(None),
        }
    }

    async fn mutate(
        &self,
        id: &DocumentId,
        mutation: DocumentMutation,
    ) -> Result<Document, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let row = sqlx::query(
            r#"
            SELECT id, title, author_id, content, created_at, updated_at
            FROM documents
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock document"))?
        .ok_or_else(|| DomainError::not_found(ErrorCode::DocumentNotFound, "document", id))?;

        let versions = Self::load_versions(&mut *tx, id.as_uuid()).await?;
        let mut document = row_to_document(row, versions)?;
        let before = document.version_count();

        // Dropping the transaction on error rolls it back.
        mutation(&mut document)?;

        if document.version_count() < before {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Version history is append-only",
            ));
        }

        sqlx::query(
            r#"
            UPDATE documents SET title = $2, content = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(document.title())
        .bind(document.content())
        .bind(document.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to update document"))?;

        Self::insert_versions(
            &mut tx,
            id.as_uuid(),
            before,
            &document.versions()[before..],
        )
        .await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit document mutation"))?;

        Ok(document)
    }

    async fn list(&self, filter: &DocumentFilter) -> Result<Vec<Document>, DomainError> {
        let pattern = filter
            .title_contains
            .as_ref()
            .map(|needle| format!("%{}%", escape_like(needle)));

        let rows = sqlx::query(
            r#"
            SELECT id, title, author_id, content, created_at, updated_at
            FROM documents
            WHERE ($1::TEXT IS NULL OR author_id = $1)
              AND ($2::TEXT IS NULL OR title ILIKE $2 ESCAPE '\')
            ORDER BY updated_at DESC
            "#,
        )
        .bind(filter.author.as_ref().map(UserId::as_str))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list documents"))?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in rows {
            let id: Uuid = column(&row, "id")?;
            let versions = Self::load_versions(&self.pool, &id).await?;
            documents.push(row_to_document(row, versions)?);
        }
        Ok(documents)
    }
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn row_to_document(row: PgRow, versions: Vec<VersionEntry>) -> Result<Document, DomainError> {
    let id: Uuid = column(&row, "id")?;
    let author: String = column(&row, "author_id")?;
    let created_at: DateTime<Utc> = column(&row, "created_at")?;
    let updated_at: DateTime<Utc> = column(&row, "updated_at")?;

    Ok(Document::reconstitute(
        DocumentId::from_uuid(id),
        column(&row, "title")?,
        UserId::new(author)?,
        column(&row, "content")?,
        versions,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

fn row_to_version(row: PgRow) -> Result<VersionEntry, DomainError> {
    let editor: String = column(&row, "editor_id")?;
    let created_at: DateTime<Utc> = column(&row, "created_at")?;

    Ok(VersionEntry {
        content: column(&row, "content")?,
        editor: UserId::new(editor)?,
        timestamp: Timestamp::from_datetime(created_at),
    })
}
