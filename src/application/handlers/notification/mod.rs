//! Recipient-side notification handlers.
//!
//! Every query and command is scoped to the calling user. After a change
//! that moves the unread count, connected sessions get the new count.

mod delete_notifications;
mod list_notifications;
mod mark_read;
mod unread_count;

pub use delete_notifications::{DeleteNotificationsCommand, DeleteNotificationsHandler};
pub use list_notifications::{
    ListNotificationsHandler, ListNotificationsQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use mark_read::{MarkReadCommand, MarkReadHandler};
pub use unread_count::UnreadCountHandler;
