//! Property listings for Estate.
//!
//! This module provides the listing model, the search filter engine and
//! listing persistence.

pub mod query;
mod repository;
mod store;
mod types;

pub use query::{
    central_angle, distance_km, Filter, FilterParams, GeoCircle, ListingQuery, EARTH_RADIUS_KM,
};
pub use repository::ListingRepository;
pub use store::ListingStore;
pub use types::{
    GeoPoint, Listing, ListingDraft, ListingStatus, NewListing, OwnerSummary, PropertyType,
};
