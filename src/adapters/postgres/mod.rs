//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresDocumentRepository` - documents and their version rows
//! - `PostgresProposalRepository` - proposals with a conditional status update
//! - `PostgresNotificationRepository` - recipient-scoped notification rows
//! - `PostgresUserDirectory` - users and roles
//!
//! All queries are built at runtime; the schema lives in `migrations/`.

mod document_repository;
mod notification_repository;
mod proposal_repository;
mod user_directory;

pub use document_repository::PostgresDocumentRepository;
pub use notification_repository::PostgresNotificationRepository;
pub use proposal_repository::PostgresProposalRepository;
pub use user_directory::PostgresUserDirectory;

use sqlx::PgPool;

use crate::domain::foundation::DomainError;

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Map a sqlx error to `DatabaseError` with the failed operation as context.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::database(context, e)
}

/// Parse a stored value through `FromStr`, reporting corrupt rows as
/// `DatabaseError`.
pub(crate) fn parse_column<T>(column: &'static str, raw: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| DomainError::database(column, format!("invalid stored value: {}", e)))
}

/// Read one column, reporting decode failures as `DatabaseError`.
pub(crate) fn column<'r, T>(row: &'r sqlx::postgres::PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    use sqlx::Row;
    row.try_get(name)
        .map_err(|e| DomainError::database("Failed to decode row", e))
}
