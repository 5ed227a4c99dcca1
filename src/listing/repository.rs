//! Listing repository for Estate.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::warn;
use uuid::Uuid;

use super::query::ListingQuery;
use super::types::{GeoPoint, Listing, ListingStatus, NewListing, OwnerSummary, PropertyType};
use crate::{EstateError, Result};

const LISTING_SELECT: &str = "SELECT l.id, l.owner_id, l.title, l.description, l.region,
        l.district, l.address, l.property_type, l.rent_price, l.purchase_price,
        l.photos, l.videos, l.latitude, l.longitude, l.status, l.created_at,
        u.id AS owner_ref, u.name AS owner_name, u.email AS owner_email, u.phone AS owner_phone
    FROM listings l
    LEFT JOIN users u ON u.id = l.owner_id";

/// Repository for listing records.
pub struct ListingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ListingRepository<'a> {
    /// Create a new ListingRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a listing owned by `owner_id` and return it with the owner expanded.
    pub async fn create(&self, listing: &NewListing, owner_id: &str) -> Result<Listing> {
        let id = Uuid::new_v4().to_string();
        let photos = serde_json::to_string(&listing.photos)
            .map_err(|e| EstateError::Internal(e.to_string()))?;
        let videos = serde_json::to_string(&listing.videos)
            .map_err(|e| EstateError::Internal(e.to_string()))?;

        sqlx::query(
            "INSERT INTO listings (id, owner_id, title, description, region, district, address,
                                   property_type, rent_price, purchase_price, photos, videos,
                                   latitude, longitude, status)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(owner_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(&listing.region)
        .bind(&listing.district)
        .bind(&listing.address)
        .bind(listing.property_type.as_str())
        .bind(listing.rent_price)
        .bind(listing.purchase_price)
        .bind(photos)
        .bind(videos)
        .bind(listing.location.map(|p| p.latitude))
        .bind(listing.location.map(|p| p.longitude))
        .bind(ListingStatus::default().as_str())
        .execute(self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| EstateError::NotFound("Property".to_string()))
    }

    /// Get a listing by ID.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Listing>> {
        let sql = format!("{LISTING_SELECT} WHERE l.id = ?");
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(ListingRow::into_listing))
    }

    /// List listings matching `query`, newest first.
    pub async fn list(&self, query: &ListingQuery) -> Result<Vec<Listing>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(LISTING_SELECT);
        qb.push(" WHERE 1 = 1");
        let residual = query.push_conditions(&mut qb);
        qb.push(" ORDER BY l.created_at DESC, l.rowid DESC");

        let rows: Vec<ListingRow> = qb.build_query_as().fetch_all(self.pool).await?;

        let listings = rows.into_iter().map(ListingRow::into_listing);
        Ok(if residual {
            listings.filter(|l| query.matches(l)).collect()
        } else {
            listings.collect()
        })
    }

    /// Count stored listings.
    #[cfg(test)]
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM listings")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }
}

/// Internal struct for mapping database rows to Listing.
#[derive(sqlx::FromRow)]
struct ListingRow {
    id: String,
    owner_id: String,
    title: String,
    description: String,
    region: String,
    district: String,
    address: String,
    property_type: String,
    rent_price: Option<f64>,
    purchase_price: Option<f64>,
    photos: String,
    videos: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    status: String,
    created_at: String,
    owner_ref: Option<String>,
    owner_name: Option<String>,
    owner_email: Option<String>,
    owner_phone: Option<String>,
}

impl ListingRow {
    fn into_listing(self) -> Listing {
        let owner = match (self.owner_ref, self.owner_name, self.owner_email, self.owner_phone) {
            (Some(id), Some(name), Some(email), Some(phone)) => Some(OwnerSummary {
                id,
                name,
                email,
                phone,
            }),
            _ => None,
        };

        let location = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                longitude,
                latitude,
            }),
            _ => None,
        };

        let property_type = self.property_type.parse().unwrap_or_else(|e| {
            warn!("Listing {} has {}; treating as house", self.id, e);
            PropertyType::House
        });

        Listing {
            photos: parse_paths(&self.id, &self.photos),
            videos: parse_paths(&self.id, &self.videos),
            id: self.id,
            owner_id: self.owner_id,
            owner,
            title: self.title,
            description: self.description,
            region: self.region,
            district: self.district,
            address: self.address,
            property_type,
            rent_price: self.rent_price,
            purchase_price: self.purchase_price,
            location,
            status: self.status.parse().unwrap_or_default(),
            created_at: self.created_at,
        }
    }
}

fn parse_paths(listing_id: &str, json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_else(|e| {
        warn!("Listing {} has malformed media list: {}", listing_id, e);
        Vec::new()
    })
}
