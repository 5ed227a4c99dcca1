//! Estate - real-estate listing API
//!
//! Accounts with roles, JWT sessions, property listings with photo and
//! video uploads, and search by region, type, price and distance.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod listing;
pub mod logging;
pub mod media;
pub mod web;

pub use auth::{
    authorize, CredentialStore, Identity, Operation, PasswordError, PolicyError, Registration,
    SecretHasher, TokenClaims, TokenError, TokenService, ValidationError,
};
pub use config::Config;
pub use db::{Database, NewUser, Role, User, UserProfile, UserRepository};
pub use error::{EstateError, Result};
pub use listing::{
    FilterParams, GeoCircle, GeoPoint, Listing, ListingQuery, ListingStore, NewListing,
    PropertyType,
};
pub use media::{MediaKind, MediaStorage, UploadPolicy};
pub use web::WebServer;
