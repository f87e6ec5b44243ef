//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `DocumentRepository` - Documents with atomic `mutate`
//! - `ProposalRepository` - Proposals with compare-and-set `transition`
//! - `NotificationRepository` - Recipient-scoped notification records
//!
//! ## Identity Ports
//!
//! - `SessionValidator` - Bearer credential verification
//! - `UserDirectory` - Capability resolution and role-group membership
//!
//! ## Live Delivery
//!
//! - `ConnectionRegistry` - Process-wide live channel registry

mod connection_registry;
mod document_repository;
mod notification_repository;
mod proposal_repository;
mod session_validator;
mod user_directory;

pub use connection_registry::{
    ConnectionId, ConnectionRegistry, ConnectionRegistryError, LiveEvent, LiveSender,
};
pub use document_repository::{DocumentMutation, DocumentRepository};
pub use notification_repository::NotificationRepository;
pub use proposal_repository::ProposalRepository;
pub use session_validator::SessionValidator;
pub use user_directory::{UserDirectory, UserRecord};
