//! API handlers for the web API.

pub mod auth;
pub mod property;

pub use auth::*;
pub use property::*;

use std::sync::Arc;

use crate::auth::{CredentialStore, SecretHasher, TokenService};
use crate::config::Config;
use crate::listing::ListingStore;
use crate::media::{MediaStorage, UploadPolicy};
use crate::{Database, EstateError, Result};

/// Application state shared across handlers.
///
/// Built once at startup; nothing in it changes afterwards.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub credentials: CredentialStore,
    pub tokens: Arc<TokenService>,
    pub listings: ListingStore,
    pub media: MediaStorage,
    pub uploads: UploadPolicy,
}

impl AppState {
    /// Create the application state from configuration.
    pub fn new(db: Database, config: &Config) -> Result<Self> {
        let hasher = SecretHasher::from_config(&config.auth)
            .map_err(|e| EstateError::Config(format!("invalid hashing parameters: {e}")))?;
        let media = MediaStorage::new(&config.uploads.path, &config.uploads.public_prefix)?;

        Ok(Self {
            credentials: CredentialStore::new(db.pool().clone(), hasher),
            tokens: Arc::new(TokenService::from_config(&config.auth)),
            listings: ListingStore::new(db.pool().clone()),
            media,
            uploads: UploadPolicy::from_config(&config.uploads),
            db,
        })
    }
}
