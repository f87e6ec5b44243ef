//! HTTP DTOs for document endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::document::{Document, DocumentFilter, VersionEntry};
use crate::domain::foundation::UserId;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Query parameters for listing documents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDocumentsParams {
    #[serde(default)]
    pub author: Option<String>,
    /// Title substring, case-insensitive
    #[serde(default)]
    pub q: Option<String>,
}

impl ListDocumentsParams {
    /// A blank author matches nobody, so it is treated as absent.
    pub fn into_filter(self) -> DocumentFilter {
        DocumentFilter {
            author: self.author.and_then(|a| UserId::new(a).ok()),
            title_contains: self.q.filter(|q| !q.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionResponse {
    pub content: String,
    pub editor_id: String,
    pub timestamp: String,
}

impl From<&VersionEntry> for VersionResponse {
    fn from(entry: &VersionEntry) -> Self {
        Self {
            content: entry.content.clone(),
            editor_id: entry.editor.to_string(),
            timestamp: entry.timestamp.as_datetime().to_rfc3339(),
        }
    }
}

/// Full document with its history, oldest version first.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub title: String,
    pub author_id: String,
    pub content: String,
    pub versions: Vec<VersionResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Document> for DocumentResponse {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id().to_string(),
            title: doc.title().to_string(),
            author_id: doc.author().to_string(),
            content: doc.content().to_string(),
            versions: doc.versions().iter().map(VersionResponse::from).collect(),
            created_at: doc.created_at().as_datetime().to_rfc3339(),
            updated_at: doc.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummaryResponse {
    pub id: String,
    pub title: String,
    pub author_id: String,
    pub version_count: usize,
    pub updated_at: String,
}

impl From<&Document> for DocumentSummaryResponse {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id().to_string(),
            title: doc.title().to_string(),
            author_id: doc.author().to_string(),
            version_count: doc.version_count(),
            updated_at: doc.updated_at().as_datetime().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DocumentId, Timestamp};

    #[test]
    fn create_request_defaults_content() {
        let req: CreateDocumentRequest = serde_json::from_str(r#"{"title": "Guide"}"#).unwrap();
        assert_eq!(req.title, "Guide");
        assert!(req.content.is_empty());
    }

    #[test]
    fn blank_params_become_empty_filter() {
        let params = ListDocumentsParams {
            author: Some("  ".into()),
            q: Some("".into()),
        };
        assert_eq!(params.into_filter(), DocumentFilter::default());
    }

    #[test]
    fn response_lists_versions_in_order() {
        let author = UserId::new("admin").unwrap();
        let mut doc = Document::new(DocumentId::new(), "Guide", author.clone(), "v1").unwrap();
        doc.apply("v2".into(), author.clone(), Timestamp::now());
        doc.apply("v3".into(), author, Timestamp::now());

        let response = DocumentResponse::from(&doc);
        assert_eq!(response.content, "v3");
        let history: Vec<&str> = response.versions.iter().map(|v| v.content.as_str()).collect();
        assert_eq!(history, vec!["v1", "v2"]);
        assert_eq!(DocumentSummaryResponse::from(&doc).version_count, 2);
    }
}
