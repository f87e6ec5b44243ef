//! HTTP middleware for axum.

pub mod auth;

pub use auth::{
    auth_error_response, auth_middleware, AuthRejection, AuthState, Caller, RequireAuth,
    REQUEST_ID_HEADER,
};
