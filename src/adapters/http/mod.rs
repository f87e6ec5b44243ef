//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure;
//! [`app`] wires them, the live channel and the tower layers into one router.

pub mod app;
pub mod documents;
pub mod error;
pub mod middleware;
pub mod notifications;
pub mod proposals;

pub use app::{build_router, AppPorts};
pub use error::ErrorResponse;
