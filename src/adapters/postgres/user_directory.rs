//! PostgreSQL implementation of UserDirectory.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool};

use crate::domain::foundation::{DomainError, Role, RoleGroup, UserId};
use crate::ports::{UserDirectory, UserRecord};

use super::{column, db_error, parse_column};

const ROLES: [Role; 3] = [Role::Viewer, Role::Editor, Role::Admin];

#[derive(Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a user or update their name and role.
    pub async fn upsert(&self, record: &UserRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, display_name, role) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET display_name = EXCLUDED.display_name, role = EXCLUDED.role
            "#,
        )
        .bind(record.id.as_str())
        .bind(&record.display_name)
        .bind(record.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to upsert user"))?;

        Ok(())
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find(&self, user_id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        let row = sqlx::query("SELECT id, display_name, role FROM users WHERE id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch user"))?;

        row.map(row_to_user).transpose()
    }

    async fn members(&self, group: RoleGroup) -> Result<Vec<UserId>, DomainError> {
        let roles = roles_in(group);
        let ids: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM users WHERE role = ANY($1) ORDER BY id")
                .bind(&roles)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("Failed to list group members"))?;

        ids.into_iter()
            .map(|(id,)| UserId::new(id).map_err(DomainError::from))
            .collect()
    }
}

/// Roles whose capability set places them in `group`.
fn roles_in(group: RoleGroup) -> Vec<String> {
    ROLES
        .iter()
        .filter(|role| group.includes(&role.capabilities()))
        .map(|role| role.as_str().to_string())
        .collect()
}

fn row_to_user(row: PgRow) -> Result<UserRecord, DomainError> {
    let id: String = column(&row, "id")?;
    let role: String = column(&row, "role")?;
    Ok(UserRecord::new(
        UserId::new(id)?,
        column::<String>(&row, "display_name")?,
        parse_column::<Role>("role", &role)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reviewers_are_admins_and_viewers_are_view_only() {
        assert_eq!(roles_in(RoleGroup::Reviewers), vec!["admin"]);
        assert_eq!(roles_in(RoleGroup::Viewers), vec!["viewer"]);
    }
}
