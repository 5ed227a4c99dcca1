//! Listing store: validated creation and lookups.

use sqlx::SqlitePool;
use tracing::info;

use super::query::ListingQuery;
use super::repository::ListingRepository;
use super::types::{Listing, NewListing};
use crate::{EstateError, Result};

/// Property listing persistence.
#[derive(Debug, Clone)]
pub struct ListingStore {
    pool: SqlitePool,
}

impl ListingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Validate and store a listing owned by `owner_id`.
    ///
    /// Ownership is not re-checked here; callers authorize first.
    pub async fn create(&self, listing: &NewListing, owner_id: &str) -> Result<Listing> {
        listing.validate()?;

        let created = ListingRepository::new(&self.pool)
            .create(listing, owner_id)
            .await?;
        info!("Listing {} created by {}", created.id, owner_id);
        Ok(created)
    }

    /// Fetch a single listing.
    pub async fn find_by_id(&self, id: &str) -> Result<Listing> {
        ListingRepository::new(&self.pool)
            .get_by_id(id)
            .await?
            .ok_or_else(|| EstateError::NotFound("Property".to_string()))
    }

    /// All listings matching `query`, newest first.
    pub async fn find_all(&self, query: &ListingQuery) -> Result<Vec<Listing>> {
        ListingRepository::new(&self.pool).list(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, Role, UserRepository};
    use crate::listing::query::{Filter, FilterParams};
    use crate::listing::types::{GeoPoint, PropertyType};
    use crate::Database;

    async fn setup() -> (Database, ListingStore, String) {
        let db = Database::open_in_memory().await.unwrap();
        let owner = UserRepository::new(db.pool())
            .create(&NewUser::new(
                "Amina",
                "amina@example.com",
                "hash",
                "+256700000000",
                Role::Landlord,
            ))
            .await
            .unwrap();
        let store = ListingStore::new(db.pool().clone());
        (db, store, owner.id)
    }

    fn kololo_house() -> NewListing {
        NewListing {
            title: "Family house".to_string(),
            description: "Four bedrooms".to_string(),
            region: "Kololo".to_string(),
            district: "Kampala".to_string(),
            address: "Plot 12".to_string(),
            property_type: PropertyType::House,
            rent_price: Some(1_000_000.0),
            purchase_price: None,
            location: Some(GeoPoint::new(32.593, 0.338).unwrap()),
            photos: vec!["/uploads/ab/front.jpg".to_string()],
            videos: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_listing() {
        let (_db, store, owner_id) = setup().await;

        let mut no_photo = kololo_house();
        no_photo.photos.clear();
        assert!(matches!(
            store.create(&no_photo, &owner_id).await,
            Err(EstateError::Validation(_))
        ));

        let mut negative = kololo_house();
        negative.rent_price = Some(-1.0);
        assert!(matches!(
            store.create(&negative, &owner_id).await,
            Err(EstateError::Validation(_))
        ));

        assert!(store.find_all(&ListingQuery::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_id_not_found() {
        let (_db, store, _) = setup().await;

        let err = store.find_by_id("does-not-exist").await.unwrap_err();
        assert_eq!(err.to_string(), "Property not found");
    }

    #[tokio::test]
    async fn test_kololo_scenario() {
        let (_db, store, owner_id) = setup().await;
        let created = store.create(&kololo_house(), &owner_id).await.unwrap();

        let params = FilterParams {
            region: Some("kolo".to_string()),
            property_type: Some("house".to_string()),
            max_price: Some("1500000".to_string()),
            ..FilterParams::default()
        };
        let found = store.find_all(&params.into_query().unwrap()).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);
    }

    #[tokio::test]
    async fn test_results_satisfy_every_filter() {
        let (_db, store, owner_id) = setup().await;
        store.create(&kololo_house(), &owner_id).await.unwrap();

        let mut apartment = kololo_house();
        apartment.property_type = PropertyType::Apartment;
        apartment.rent_price = Some(3_000_000.0);
        store.create(&apartment, &owner_id).await.unwrap();

        let query = ListingQuery::new()
            .with(Filter::Region("kololo".to_string()))
            .with(Filter::MaxRent(2_000_000.0));
        let found = store.find_all(&query).await.unwrap();

        assert_eq!(found.len(), 1);
        assert!(found.iter().all(|l| query.matches(l)));
    }
}
