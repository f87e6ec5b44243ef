//! HTTP DTOs for notification endpoints.
//!
//! `NotificationResponse` is also the payload of the live
//! `notification.new` event.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::NotificationId;
use crate::domain::notification::{
    Notification, NotificationKind, NotificationPage, ReadSelection,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListNotificationsParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub unread_only: bool,
}

/// `{"ids": [...]}` or `{"all": true}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkReadRequest {
    #[serde(default)]
    pub ids: Option<Vec<String>>,
    #[serde(default)]
    pub all: bool,
}

impl MarkReadRequest {
    pub fn selection(self) -> Result<ReadSelection, String> {
        if self.all {
            return Ok(ReadSelection::All);
        }
        let ids = self
            .ids
            .ok_or_else(|| "Either ids or all=true is required".to_string())?;
        ids.iter()
            .map(|raw| {
                raw.parse::<NotificationId>()
                    .map_err(|_| format!("Invalid notification ID: {}", raw))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ReadSelection::Ids)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposal_id: Option<String>,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<&Notification> for NotificationResponse {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id().to_string(),
            kind: n.kind(),
            title: n.title().to_string(),
            message: n.message().to_string(),
            actor_id: n.actor_id().map(ToString::to_string),
            document_id: n.document_id().map(ToString::to_string),
            proposal_id: n.proposal_id().map(ToString::to_string),
            metadata: n.metadata().clone(),
            is_read: n.is_read(),
            created_at: n.created_at().as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationPageResponse {
    pub items: Vec<NotificationResponse>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl From<NotificationPage> for NotificationPageResponse {
    fn from(page: NotificationPage) -> Self {
        Self {
            items: page.items.iter().map(NotificationResponse::from).collect(),
            page: page.page,
            limit: page.limit,
            total: page.total,
            pages: page.pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// Number of notifications changed or removed.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatedCountResponse {
    pub updated: u64,
}
