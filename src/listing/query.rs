//! Listing search filters.
//!
//! A [`ListingQuery`] is a conjunction of [`Filter`]s: a listing matches
//! only if every filter matches, so adding a filter can only narrow the
//! result. Region, type and price filters are pushed into SQL; the geo
//! filter is evaluated on the candidate rows.

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;

use super::types::{non_blank, parse_number, GeoPoint, Listing, PropertyType};
use crate::{EstateError, Result};

/// Earth radius used for radius searches, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6378.1;

/// Central angle in radians between two points (haversine formula).
pub fn central_angle(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Great-circle distance in kilometres.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    central_angle(a, b) * EARTH_RADIUS_KM
}

/// A spherical cap around a center point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCircle {
    pub center: GeoPoint,
    pub radius_km: f64,
}

impl GeoCircle {
    /// Create a circle. The radius must be a positive number of kilometres.
    pub fn new(center: GeoPoint, radius_km: f64) -> Result<Self> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(EstateError::Validation(
                "radius must be a positive number".to_string(),
            ));
        }
        Ok(Self { center, radius_km })
    }

    /// Angular radius in radians.
    pub fn angular_radius(&self) -> f64 {
        self.radius_km / EARTH_RADIUS_KM
    }

    /// Whether `point` lies inside the cap (boundary included).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        central_angle(&self.center, point) <= self.angular_radius()
    }
}

/// A single search constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Region contains the text (ASCII case-insensitive, literal).
    Region(String),
    /// Exact property type.
    Type(PropertyType),
    /// Rent price at most the bound; listings without a rent price never match.
    MaxRent(f64),
    /// Location inside the circle; listings without a location never match.
    Within(GeoCircle),
}

impl Filter {
    /// Whether a listing satisfies this filter.
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            Filter::Region(needle) => listing
                .region
                .to_ascii_lowercase()
                .contains(&needle.to_ascii_lowercase()),
            Filter::Type(t) => listing.property_type == *t,
            Filter::MaxRent(bound) => listing.rent_price.is_some_and(|p| p <= *bound),
            Filter::Within(circle) => listing
                .location
                .as_ref()
                .is_some_and(|p| circle.contains(p)),
        }
    }

    /// Append this filter as an `AND` condition, if it can run in SQL.
    ///
    /// Returns `false` for filters that must be evaluated in Rust.
    fn push_condition(&self, qb: &mut QueryBuilder<'_, Sqlite>) -> bool {
        match self {
            Filter::Region(needle) => {
                qb.push(" AND instr(lower(l.region), lower(");
                qb.push_bind(needle.clone());
                qb.push(")) > 0");
                true
            }
            Filter::Type(t) => {
                qb.push(" AND l.property_type = ");
                qb.push_bind(t.as_str());
                true
            }
            Filter::MaxRent(bound) => {
                qb.push(" AND l.rent_price IS NOT NULL AND l.rent_price <= ");
                qb.push_bind(*bound);
                true
            }
            Filter::Within(_) => false,
        }
    }
}

/// Conjunction of filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingQuery {
    filters: Vec<Filter>,
}

impl ListingQuery {
    /// A query with no constraints (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter.
    pub fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a filter in place.
    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Whether a listing satisfies every filter.
    pub fn matches(&self, listing: &Listing) -> bool {
        self.filters.iter().all(|f| f.matches(listing))
    }

    /// Append the SQL-executable filters as `AND` conditions.
    ///
    /// Returns `true` if some filters still need [`ListingQuery::matches`].
    pub fn push_conditions(&self, qb: &mut QueryBuilder<'_, Sqlite>) -> bool {
        let mut residual = false;
        for filter in &self.filters {
            if !filter.push_condition(qb) {
                residual = true;
            }
        }
        residual
    }
}

/// Search parameters as sent by clients.
///
/// Every value is optional and blank values count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub region: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

impl FilterParams {
    /// Build a query from the parameters.
    ///
    /// The geo filter applies only when `lat`, `lng` and `radius` are all
    /// present; a partial set is ignored.
    pub fn into_query(self) -> Result<ListingQuery> {
        let mut query = ListingQuery::new();

        if let Some(region) = non_blank(self.region) {
            query.push(Filter::Region(region));
        }

        if let Some(t) = non_blank(self.property_type) {
            let t = t
                .parse::<PropertyType>()
                .map_err(|_| EstateError::Validation(format!("invalid property type: {t}")))?;
            query.push(Filter::Type(t));
        }

        if let Some(bound) = parse_number("maxPrice", self.max_price)? {
            if bound <= 0.0 {
                return Err(EstateError::Validation(
                    "maxPrice must be a positive number".to_string(),
                ));
            }
            query.push(Filter::MaxRent(bound));
        }

        let lat = parse_number("lat", self.lat)?;
        let lng = parse_number("lng", self.lng)?;
        let radius = parse_number("radius", self.radius)?;
        match (lat, lng, radius) {
            (Some(lat), Some(lng), Some(radius)) => {
                let center = GeoPoint::new(lng, lat)?;
                query.push(Filter::Within(GeoCircle::new(center, radius)?));
            }
            (None, None, None) => {}
            _ => debug!("Ignoring incomplete geo filter"),
        }

        Ok(query)
    }
}
