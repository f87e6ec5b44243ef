//! Document aggregate entity.

use crate::domain::foundation::{DocumentId, DomainError, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Maximum length for a document title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// One prior content value, recorded when it was replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Content as it was before the apply that recorded this entry.
    pub content: String,
    /// Actor whose apply replaced this content.
    pub editor: UserId,
    pub timestamp: Timestamp,
}

/// Document aggregate.
///
/// # Invariants
///
/// - `title` is non-empty and at most `MAX_TITLE_LENGTH` characters
/// - `versions` is append-only and ordered by apply time
/// - every content change appends exactly one `VersionEntry`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: DocumentId,
    title: String,
    author: UserId,
    content: String,
    versions: Vec<VersionEntry>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Document {
    /// Create a document with no history.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title is empty or too long
    pub fn new(
        id: DocumentId,
        title: impl Into<String>,
        author: UserId,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        Self::validate_title(&title)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            title,
            author,
            content: content.into(),
            versions: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a document from persistence (no validation).
    pub fn reconstitute(
        id: DocumentId,
        title: String,
        author: UserId,
        content: String,
        versions: Vec<VersionEntry>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            title,
            author,
            content,
            versions,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &UserId {
        &self.author
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Prior content values, oldest first.
    pub fn versions(&self) -> &[VersionEntry] {
        &self.versions
    }

    pub fn version_count(&self) -> usize {
        self.versions.len()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the content, recording the current content as a version first.
    ///
    /// Returns the appended entry.
    pub fn apply(&mut self, new_content: String, editor: UserId, at: Timestamp) -> &VersionEntry {
        let previous = std::mem::replace(&mut self.content, new_content);
        self.versions.push(VersionEntry {
            content: previous,
            editor,
            timestamp: at,
        });
        self.updated_at = at;
        &self.versions[self.versions.len() - 1]
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn validate_title(title: &str) -> Result<(), DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(DomainError::validation(
                "title",
                format!("Title cannot exceed {} characters", MAX_TITLE_LENGTH),
            ));
        }
        Ok(())
    }
}

/// Listing filter. Empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    pub author: Option<UserId>,
    /// Case-insensitive substring of the title.
    pub title_contains: Option<String>,
}

impl DocumentFilter {
    pub fn matches(&self, document: &Document) -> bool {
        if let Some(author) = &self.author {
            if document.author() != author {
                return false;
            }
        }
        if let Some(needle) = &self.title_contains {
            if !document
                .title()
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}
