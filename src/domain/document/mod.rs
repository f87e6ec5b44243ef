//! Document module - canonical versioned text.
//!
//! `content` changes only through [`Document::apply`], which appends the
//! pre-change content to `versions` first. Documents are never deleted.

mod aggregate;
mod errors;

pub use aggregate::{Document, DocumentFilter, VersionEntry, MAX_TITLE_LENGTH};
pub use errors::DocumentError;
