//! Notification module - per-recipient event records.
//!
//! Written only by the dispatcher. After creation the recipient may flip
//! `is_read` or delete the record; `delivered` only ever goes false -> true.

mod aggregate;
mod errors;
mod kind;
mod paging;

pub use aggregate::{DispatchOptions, Notification};
pub use errors::NotificationError;
pub use kind::NotificationKind;
pub use paging::{NotificationPage, PageRequest, ReadSelection};
