//! Notification kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A proposal awaits review.
    Submitted,
    /// The recipient's proposal was approved.
    Approved,
    /// The recipient's proposal was rejected.
    Rejected,
    /// A document received new content.
    Published,
    /// Document metadata changed.
    Updated,
    CommentAdded,
    SystemAnnouncement,
    Reminder,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Submitted => "submitted",
            NotificationKind::Approved => "approved",
            NotificationKind::Rejected => "rejected",
            NotificationKind::Published => "published",
            NotificationKind::Updated => "updated",
            NotificationKind::CommentAdded => "comment_added",
            NotificationKind::SystemAnnouncement => "system_announcement",
            NotificationKind::Reminder => "reminder",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "submitted" => NotificationKind::Submitted,
            "approved" => NotificationKind::Approved,
            "rejected" => NotificationKind::Rejected,
            "published" => NotificationKind::Published,
            "updated" => NotificationKind::Updated,
            "comment_added" => NotificationKind::CommentAdded,
            "system_announcement" => NotificationKind::SystemAnnouncement,
            "reminder" => NotificationKind::Reminder,
            other => {
                return Err(ValidationError::invalid_format(
                    "kind",
                    format!("unknown notification kind '{}'", other),
                ))
            }
        })
    }
}
