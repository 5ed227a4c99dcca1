//! Response DTOs for the web API.
//!
//! Bodies are returned bare (no envelope); field names are camelCase.

use serde::Serialize;

use crate::db::{Role, UserProfile};
use crate::listing::{GeoPoint, Listing, ListingStatus, OwnerSummary, PropertyType};

/// Issued session token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub role: Role,
}

/// The caller's own profile.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<UserProfile> for MeResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            role: profile.role,
        }
    }
}

/// Listing owner contact details.
#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<OwnerSummary> for OwnerResponse {
    fn from(owner: OwnerSummary) -> Self {
        Self {
            id: owner.id,
            name: owner.name,
            email: owner.email,
            phone: owner.phone,
        }
    }
}

/// GeoJSON point: `{"type": "Point", "coordinates": [lng, lat]}`.
#[derive(Debug, Serialize)]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: [f64; 2],
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: "Point",
            coordinates: [point.longitude, point.latitude],
        }
    }
}

/// A property listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: String,
    /// `null` when the owner account no longer exists.
    pub owner: Option<OwnerResponse>,
    pub title: String,
    pub description: String,
    pub region: String,
    pub district: String,
    pub address: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    pub photos: Vec<String>,
    pub videos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoJsonPoint>,
    pub status: ListingStatus,
    pub created_at: String,
}

impl From<Listing> for ListingResponse {
    fn from(listing: Listing) -> Self {
        Self {
            id: listing.id,
            owner: listing.owner.map(OwnerResponse::from),
            title: listing.title,
            description: listing.description,
            region: listing.region,
            district: listing.district,
            address: listing.address,
            property_type: listing.property_type,
            rent_price: listing.rent_price,
            purchase_price: listing.purchase_price,
            photos: listing.photos,
            videos: listing.videos,
            location: listing.location.map(GeoJsonPoint::from),
            status: listing.status,
            created_at: listing.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Listing {
        Listing {
            id: "l-1".to_string(),
            owner_id: "u-1".to_string(),
            owner: Some(OwnerSummary {
                id: "u-1".to_string(),
                name: "Amina".to_string(),
                email: "amina@example.com".to_string(),
                phone: "+256700000000".to_string(),
            }),
            title: "Family house".to_string(),
            description: "Four bedrooms".to_string(),
            region: "Kololo".to_string(),
            district: "Kampala".to_string(),
            address: "Plot 12".to_string(),
            property_type: PropertyType::House,
            rent_price: Some(1_000_000.0),
            purchase_price: None,
            photos: vec!["/uploads/ab/front.jpg".to_string()],
            videos: Vec::new(),
            location: Some(GeoPoint {
                longitude: 32.593,
                latitude: 0.338,
            }),
            status: ListingStatus::Available,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_listing_response_shape() {
        let json = serde_json::to_value(ListingResponse::from(listing())).unwrap();

        assert_eq!(json["type"], "house");
        assert_eq!(json["rentPrice"], 1_000_000.0);
        assert!(json.get("purchasePrice").is_none());
        assert_eq!(json["status"], "available");
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00.000Z");
        assert_eq!(json["owner"]["phone"], "+256700000000");
        assert_eq!(json["location"]["type"], "Point");
        assert_eq!(json["location"]["coordinates"][0], 32.593);
        assert_eq!(json["location"]["coordinates"][1], 0.338);
    }

    #[test]
    fn test_listing_response_missing_owner_is_null() {
        let mut l = listing();
        l.owner = None;
        l.location = None;

        let json = serde_json::to_value(ListingResponse::from(l)).unwrap();
        assert!(json["owner"].is_null());
        assert!(json.get("location").is_none());
    }

    #[test]
    fn test_auth_response_role_lowercase() {
        let json = serde_json::to_value(AuthResponse {
            token: "t".to_string(),
            role: Role::Landlord,
        })
        .unwrap();
        assert_eq!(json["role"], "landlord");
    }
}
