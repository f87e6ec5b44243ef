//! md-collab - collaborative markdown documents with role-gated review.
//!
//! Editors submit edit proposals against a document; reviewers see a
//! line diff and approve or reject; privileged users apply directly.
//! Every decision is recorded as an append-only version history and
//! announced through persisted notifications, pushed live over WebSocket
//! to connected recipients.
//!
//! Layout follows ports and adapters:
//! - [`domain`] - entities, state machine, diff engine, errors
//! - [`ports`] - repository, identity and live-delivery traits
//! - [`application`] - command/query handlers and the notification dispatcher
//! - [`adapters`] - HTTP, WebSocket, Postgres, in-memory and JWT implementations
//! - [`config`] - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
