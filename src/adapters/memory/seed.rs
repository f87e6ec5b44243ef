//! YAML seed data for in-memory mode.
//!
//! ```yaml
//! users:
//!   - id: admin
//!     display_name: Admin User
//!     role: admin
//! documents:
//!   - title: README.md
//!     author: admin
//!     content: |
//!       # Welcome
//! ```

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::domain::document::Document;
use crate::domain::foundation::{DocumentId, DomainError, UserId};
use crate::ports::{DocumentRepository, UserRecord};

use super::InMemoryUserDirectory;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid seed data: {0}")]
    Invalid(String),

    #[error("failed to store seed data: {0}")]
    Store(#[from] DomainError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedDocument {
    pub title: String,
    pub author: UserId,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub documents: Vec<SeedDocument>,
}

impl SeedFile {
    pub fn from_yaml(source: &str) -> Result<Self, SeedError> {
        let seed: SeedFile = serde_yaml::from_str(source)?;
        seed.validate()?;
        Ok(seed)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        Self::from_yaml(&std::fs::read_to_string(path)?)
    }

    fn validate(&self) -> Result<(), SeedError> {
        for doc in &self.documents {
            if !self.users.iter().any(|u| u.id == doc.author) {
                return Err(SeedError::Invalid(format!(
                    "document '{}' has unknown author '{}'",
                    doc.title, doc.author
                )));
            }
        }
        Ok(())
    }

    /// Load users into the directory and create the documents.
    ///
    /// Returns the number of documents created.
    pub async fn apply(
        &self,
        directory: &InMemoryUserDirectory,
        documents: &dyn DocumentRepository,
    ) -> Result<usize, SeedError> {
        for user in &self.users {
            directory.upsert(user.clone()).await;
        }
        for seed in &self.documents {
            let doc = Document::new(
                DocumentId::new(),
                seed.title.clone(),
                seed.author.clone(),
                seed.content.clone(),
            )?;
            documents.create(&doc).await?;
        }
        tracing::info!(
            users = self.users.len(),
            documents = self.documents.len(),
            "seed data loaded"
        );
        Ok(self.documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryDocumentRepository;
    use crate::domain::document::DocumentFilter;
    use crate::domain::foundation::Role;
    use crate::ports::UserDirectory;
    use std::io::Write;

    const SEED: &str = r#"
users:
  - id: admin
    display_name: Admin User
    role: admin
  - id: viewer
    display_name: Viewer User
    role: viewer
documents:
  - title: README.md
    author: admin
    content: |
      # Welcome
"#;

    #[test]
    fn parses_users_and_documents() {
        let seed = SeedFile::from_yaml(SEED).unwrap();
        assert_eq!(seed.users.len(), 2);
        assert_eq!(seed.users[1].role, Role::Viewer);
        assert_eq!(seed.documents[0].content, "# Welcome\n");
    }

    #[test]
    fn unknown_author_is_rejected() {
        let bad = "users: []\ndocuments:\n  - title: x\n    author: nobody\n";
        assert!(matches!(SeedFile::from_yaml(bad), Err(SeedError::Invalid(_))));
    }

    #[test]
    fn unknown_role_is_a_parse_error() {
        let bad = "users:\n  - id: a\n    display_name: A\n    role: owner\n";
        assert!(matches!(SeedFile::from_yaml(bad), Err(SeedError::Parse(_))));
    }

    #[tokio::test]
    async fn load_from_file_and_apply() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let seed = SeedFile::load(file.path()).unwrap();
        let directory = InMemoryUserDirectory::new();
        let documents = InMemoryDocumentRepository::new();
        let created = seed.apply(&directory, &documents).await.unwrap();

        assert_eq!(created, 1);
        assert_eq!(directory.len().await, 2);
        let docs = documents.list(&DocumentFilter::default()).await.unwrap();
        assert_eq!(docs[0].title(), "README.md");
        assert!(directory
            .find(&UserId::new("admin").unwrap())
            .await
            .unwrap()
            .is_some());
    }
}
