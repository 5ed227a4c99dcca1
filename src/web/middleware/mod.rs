//! Middleware for the web API.

pub mod auth;
pub mod cors;

pub use auth::{token_auth, AuthUser, AUTH_HEADER};
pub use cors::create_cors_layer;
