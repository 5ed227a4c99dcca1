//! Listing model for Estate.
//!
//! This module defines the property listing record, its closed enums and
//! the validation applied before a listing is stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{EstateError, Result};

/// Kind of property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
    Condo,
    Land,
    Commercial,
}

impl PropertyType {
    /// Convert property type to its wire and database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
            PropertyType::Condo => "condo",
            PropertyType::Land => "land",
            PropertyType::Commercial => "commercial",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "house" => Ok(PropertyType::House),
            "apartment" => Ok(PropertyType::Apartment),
            "condo" => Ok(PropertyType::Condo),
            "land" => Ok(PropertyType::Land),
            "commercial" => Ok(PropertyType::Commercial),
            _ => Err(format!("unknown property type: {s}")),
        }
    }
}

/// Availability of a listed property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Available,
    Rented,
    Sold,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Available => "available",
            ListingStatus::Rented => "rented",
            ListingStatus::Sold => "sold",
        }
    }
}

impl FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "available" => Ok(ListingStatus::Available),
            "rented" => Ok(ListingStatus::Rented),
            "sold" => Ok(ListingStatus::Sold),
            _ => Err(format!("unknown listing status: {s}")),
        }
    }
}

/// A point on the globe in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// Create a point, checking coordinate ranges.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(EstateError::Validation(
                "latitude must be between -90 and 90".to_string(),
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(EstateError::Validation(
                "longitude must be between -180 and 180".to_string(),
            ));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }
}

/// Public contact details of a listing's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A stored property listing with its owner expanded.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Unique listing ID (UUID).
    pub id: String,
    /// Owning account's ID.
    pub owner_id: String,
    /// Owner details; `None` if the account no longer exists.
    pub owner: Option<OwnerSummary>,
    pub title: String,
    pub description: String,
    pub region: String,
    pub district: String,
    pub address: String,
    pub property_type: PropertyType,
    pub rent_price: Option<f64>,
    pub purchase_price: Option<f64>,
    /// Public paths of uploaded photos.
    pub photos: Vec<String>,
    /// Public paths of uploaded videos.
    pub videos: Vec<String>,
    pub location: Option<GeoPoint>,
    pub status: ListingStatus,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// Data for creating a new listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub region: String,
    pub district: String,
    pub address: String,
    pub property_type: PropertyType,
    pub rent_price: Option<f64>,
    pub purchase_price: Option<f64>,
    pub location: Option<GeoPoint>,
    pub photos: Vec<String>,
    pub videos: Vec<String>,
}

impl NewListing {
    /// Validate everything except attached media.
    pub fn validate_fields(&self) -> Result<()> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("region", &self.region),
            ("district", &self.district),
            ("address", &self.address),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(EstateError::Validation(format!("{field} is required")));
            }
        }

        check_price("rentPrice", self.rent_price)?;
        check_price("purchasePrice", self.purchase_price)?;

        if let Some(point) = self.location {
            GeoPoint::new(point.longitude, point.latitude)?;
        }
        Ok(())
    }

    /// Validate the whole listing, including that at least one photo is attached.
    pub fn validate(&self) -> Result<()> {
        self.validate_fields()?;
        if self.photos.is_empty() {
            return Err(EstateError::Validation(
                "At least one photo is required".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_price(field: &str, price: Option<f64>) -> Result<()> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(EstateError::Validation(format!(
            "{field} must be a non-negative number"
        ))),
        _ => Ok(()),
    }
}

/// Listing form fields as submitted, before parsing.
///
/// Blank values are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct ListingDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
    pub district: Option<String>,
    pub address: Option<String>,
    pub property_type: Option<String>,
    pub rent_price: Option<String>,
    pub purchase_price: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl ListingDraft {
    /// Record a form field by its wire name. Unknown fields are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "region" => &mut self.region,
            "district" => &mut self.district,
            "address" => &mut self.address,
            "type" => &mut self.property_type,
            "rentPrice" => &mut self.rent_price,
            "purchasePrice" => &mut self.purchase_price,
            "latitude" => &mut self.latitude,
            "longitude" => &mut self.longitude,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Parse the draft into a typed listing with no media attached.
    pub fn parse(self) -> Result<NewListing> {
        let property_type = match non_blank(self.property_type) {
            Some(t) => t
                .parse::<PropertyType>()
                .map_err(|_| EstateError::Validation(format!("invalid property type: {t}")))?,
            None => return Err(EstateError::Validation("type is required".to_string())),
        };

        let latitude = parse_number("latitude", self.latitude)?;
        let longitude = parse_number("longitude", self.longitude)?;
        let location = match (latitude, longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lng, lat)?),
            (None, None) => None,
            _ => {
                return Err(EstateError::Validation(
                    "latitude and longitude must be given together".to_string(),
                ))
            }
        };

        let listing = NewListing {
            title: non_blank(self.title).unwrap_or_default(),
            description: non_blank(self.description).unwrap_or_default(),
            region: non_blank(self.region).unwrap_or_default(),
            district: non_blank(self.district).unwrap_or_default(),
            address: non_blank(self.address).unwrap_or_default(),
            property_type,
            rent_price: parse_number("rentPrice", self.rent_price)?,
            purchase_price: parse_number("purchasePrice", self.purchase_price)?,
            location,
            photos: Vec::new(),
            videos: Vec::new(),
        };
        listing.validate_fields()?;
        Ok(listing)
    }
}

/// Trim a value, mapping blank to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an optional numeric field. Blank means absent.
pub(crate) fn parse_number(field: &str, value: Option<String>) -> Result<Option<f64>> {
    match non_blank(value) {
        None => Ok(None),
        Some(v) => v
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| EstateError::Validation(format!("{field} must be a number"))),
    }
}
