//! Paging and selection types for recipient-side queries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{NotificationId, ValidationError};

use super::Notification;

/// 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// # Errors
    ///
    /// - `OutOfRange` if `page` is 0 or `limit` is outside `1..=max_limit`
    pub fn new(page: u32, limit: u32, max_limit: u32) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::out_of_range("page", 1, i64::from(u32::MAX), 0));
        }
        if limit == 0 || limit > max_limit {
            return Err(ValidationError::out_of_range(
                "limit",
                1,
                i64::from(max_limit),
                i64::from(limit),
            ));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// One page of a recipient's notifications, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPage {
    pub items: Vec<Notification>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl NotificationPage {
    pub fn new(items: Vec<Notification>, request: PageRequest, total: u64) -> Self {
        let limit = u64::from(request.limit());
        Self {
            items,
            page: request.page(),
            limit: request.limit(),
            total,
            pages: total.div_ceil(limit),
        }
    }
}

/// Which notifications a mark-read call targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadSelection {
    Ids(Vec<NotificationId>),
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_validates_bounds() {
        assert!(PageRequest::new(0, 20, 100).is_err());
        assert!(PageRequest::new(1, 0, 100).is_err());
        assert!(PageRequest::new(1, 101, 100).is_err());
        assert_eq!(PageRequest::new(3, 20, 100).unwrap().offset(), 40);
    }

    #[test]
    fn page_count_rounds_up() {
        let req = PageRequest::new(1, 20, 100).unwrap();
        assert_eq!(NotificationPage::new(vec![], req, 0).pages, 0);
        assert_eq!(NotificationPage::new(vec![], req, 20).pages, 1);
        assert_eq!(NotificationPage::new(vec![], req, 21).pages, 2);
    }
}
