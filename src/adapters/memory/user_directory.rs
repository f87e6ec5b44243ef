//! In-memory user directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Role, RoleGroup, UserId};
use crate::ports::{UserDirectory, UserRecord};

#[derive(Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, UserRecord>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Insert or replace a user.
    pub async fn upsert(&self, record: UserRecord) {
        self.users.write().await.insert(record.id.clone(), record);
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find(&self, user_id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn members(&self, group: RoleGroup) -> Result<Vec<UserId>, DomainError> {
        let mut members: Vec<UserId> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| group.includes(&u.capabilities()))
            .map(|u| u.id.clone())
            .collect();
        members.sort();
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Capability;

    fn directory() -> InMemoryUserDirectory {
        let record = |id: &str, role| UserRecord::new(UserId::new(id).unwrap(), id, role);
        InMemoryUserDirectory::from_records([
            record("admin", Role::Admin),
            record("ed", Role::Editor),
            record("vi", Role::Viewer),
            record("vi2", Role::Viewer),
        ])
    }

    #[tokio::test]
    async fn capabilities_follow_role() {
        let dir = directory();
        let caps = dir.capabilities(&UserId::new("ed").unwrap()).await.unwrap();
        assert!(caps.contains(Capability::Propose));
        assert!(!caps.contains(Capability::Approve));
    }

    #[tokio::test]
    async fn unknown_user_has_no_capabilities() {
        let caps = directory()
            .capabilities(&UserId::new("ghost").unwrap())
            .await
            .unwrap();
        assert_eq!(caps.iter().count(), 0);
    }

    #[tokio::test]
    async fn role_groups_resolve_members() {
        let dir = directory();
        let reviewers = dir.members(RoleGroup::Reviewers).await.unwrap();
        assert_eq!(reviewers, vec![UserId::new("admin").unwrap()]);

        let viewers = dir.members(RoleGroup::Viewers).await.unwrap();
        assert_eq!(viewers.len(), 2);
    }

    #[tokio::test]
    async fn empty_directory_has_no_members() {
        let dir = InMemoryUserDirectory::new();
        assert!(dir.members(RoleGroup::Reviewers).await.unwrap().is_empty());
    }
}
