//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, capabilities, errors, timestamps)
//! - `diff` - Pure line-diff engine used to review proposals
//! - `document` - Versioned document aggregate
//! - `proposal` - Edit proposals and their review state machine
//! - `notification` - Per-recipient notification records

pub mod diff;
pub mod document;
pub mod foundation;
pub mod notification;
pub mod proposal;
