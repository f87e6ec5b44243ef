//! User directory port - capability resolution and role-group membership.
//!
//! Identity comes from the credential; what a user may do comes from here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Actor, CapabilitySet, DomainError, Role, RoleGroup, UserId};

/// Directory entry for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub display_name: String,
    pub role: Role,
}

impl UserRecord {
    pub fn new(id: UserId, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role,
        }
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.role.capabilities()
    }
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up a user. Returns `None` if unknown.
    async fn find(&self, user_id: &UserId) -> Result<Option<UserRecord>, DomainError>;

    /// Capabilities held by a user; unknown users hold none.
    async fn capabilities(&self, user_id: &UserId) -> Result<CapabilitySet, DomainError> {
        Ok(self
            .find(user_id)
            .await?
            .map(|record| record.capabilities())
            .unwrap_or_default())
    }

    /// Resolve the capability set once for the duration of an operation.
    async fn resolve_actor(&self, user_id: &UserId) -> Result<Actor, DomainError> {
        Ok(Actor::new(user_id.clone(), self.capabilities(user_id).await?))
    }

    /// Current members of a role group.
    async fn members(&self, group: RoleGroup) -> Result<Vec<UserId>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_directory_is_object_safe() {
        fn _accepts_dyn(_dir: &dyn UserDirectory) {}
    }
}
