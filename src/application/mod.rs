//! Application layer - commands, queries and the services they share.
//!
//! Handlers orchestrate domain operations across ports. The dispatcher and
//! the per-document locks are shared by every handler of a running process.

mod document_locks;
pub mod handlers;
mod notification_dispatcher;

pub use document_locks::DocumentLocks;
pub use handlers::*;
pub use notification_dispatcher::{
    DispatchOutcome, FanOutReport, NotificationDispatcher, NotificationDraft,
    DEFAULT_FANOUT_CONCURRENCY,
};
