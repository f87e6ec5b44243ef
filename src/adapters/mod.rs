//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `auth` - JWT session validation (and a mock for tests)
//! - `http` - axum REST API
//! - `memory` - in-process stores used without a database
//! - `postgres` - sqlx-backed stores
//! - `websocket` - live notification channel and connection registry

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;

pub use auth::{JwtSessionValidator, MockSessionValidator};
pub use http::{build_router, AppPorts};
pub use websocket::InMemoryConnectionRegistry;
