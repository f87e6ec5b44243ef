//! In-memory adapters.
//!
//! Used when no database is configured, and throughout the tests. Each store
//! guards its map with a `tokio::sync::RwLock`; atomic operations run
//! entirely under the write lock.

mod document_repository;
mod notification_repository;
mod proposal_repository;
mod seed;
mod user_directory;

pub use document_repository::InMemoryDocumentRepository;
pub use notification_repository::InMemoryNotificationRepository;
pub use proposal_repository::InMemoryProposalRepository;
pub use seed::{SeedDocument, SeedError, SeedFile};
pub use user_directory::InMemoryUserDirectory;
