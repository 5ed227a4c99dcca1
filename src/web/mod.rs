//! Web API module for Estate.
//!
//! REST endpoints for accounts and property listings, plus static serving
//! of uploaded media.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_app, create_router};
pub use server::WebServer;
