//! Vendor proximity search
//!
//! Resolves the caller's position (coordinates > place id > address), asks
//! the store for nearby vendors, optionally annotates each with a routed or
//! estimated distance and applies the requested ordering.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::models::{Vendor, VendorAddress};
use super::store::{StoreError, VendorStore};
use crate::geo::{Coordinate, DistanceResult, DistanceStatus};
use crate::location::{LocationError, LocationResolver};

pub const DEFAULT_RADIUS_KM: f64 = 10.0;

pub const EMPTY_RESULT_MESSAGE: &str =
    "No vendors found in your area. Try increasing the search radius or removing service filters.";

pub const EMPTY_RESULT_SUGGESTIONS: [&str; 3] = [
    "Increase search radius to 20km",
    "Remove service type filter",
    "Check if your location is correct",
];

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Vendor not found: {0}")]
    VendorNotFound(String),
}

impl SearchError {
    fn invalid(msg: impl Into<String>) -> Self {
        Self::Location(LocationError::InvalidInput(msg.into()))
    }
}

// ============================================================================
// Query
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Distance,
    Rating,
    Name,
}

impl SortBy {
    /// Unknown values sort by distance.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("rating") => Self::Rating,
            Some("name") => Self::Name,
            _ => Self::Distance,
        }
    }
}

/// Where the search is centered.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOrigin {
    Coordinate(Coordinate),
    /// Issued by the active provider's autocomplete.
    PlaceId(String),
    Address(String),
    /// No location: plain listing, no distances.
    Unfiltered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VendorSearchQuery {
    pub origin: SearchOrigin,
    pub service_id: Option<String>,
    pub radius_km: f64,
    pub include_distance: bool,
    pub sort_by: SortBy,
}

impl Default for VendorSearchQuery {
    fn default() -> Self {
        Self {
            origin: SearchOrigin::Unfiltered,
            service_id: None,
            radius_km: DEFAULT_RADIUS_KM,
            include_distance: false,
            sort_by: SortBy::Distance,
        }
    }
}

impl VendorSearchQuery {
    pub fn near(coordinate: Coordinate) -> Self {
        Self {
            origin: SearchOrigin::Coordinate(coordinate),
            ..Default::default()
        }
    }

    fn check_radius(&self) -> Result<(), SearchError> {
        if !self.radius_km.is_finite() || self.radius_km <= 0.0 {
            return Err(SearchError::invalid(format!(
                "radius must be a positive number of kilometers, got {}",
                self.radius_km
            )));
        }
        Ok(())
    }
}

/// Search parameters as they arrive over HTTP.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchVendorsRequest {
    /// User latitude, must be paired with longitude
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    /// User longitude, must be paired with latitude
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    /// Place id from this service's autocomplete
    #[validate(length(min = 1, max = 512))]
    pub place_id: Option<String>,
    /// Free-text address to search from
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub service_id: Option<String>,
    /// Search radius in km (default 10)
    pub radius: Option<f64>,
    pub include_distance: Option<bool>,
    /// distance | rating | name
    pub sort_by: Option<String>,
}

impl TryFrom<SearchVendorsRequest> for VendorSearchQuery {
    type Error = SearchError;

    fn try_from(req: SearchVendorsRequest) -> Result<Self, Self::Error> {
        req.validate()
            .map_err(|e| SearchError::invalid(e.to_string().replace('\n', "; ")))?;

        let origin = match (req.latitude, req.longitude) {
            (Some(lat), Some(lng)) => SearchOrigin::Coordinate(Coordinate::new(lat, lng)?),
            (Some(_), None) | (None, Some(_)) => {
                return Err(SearchError::invalid(
                    "latitude and longitude must be provided together",
                ));
            }
            (None, None) => match (non_blank(req.place_id), non_blank(req.address)) {
                (Some(place_id), _) => SearchOrigin::PlaceId(place_id),
                (None, Some(address)) => SearchOrigin::Address(address),
                (None, None) => SearchOrigin::Unfiltered,
            },
        };

        let query = VendorSearchQuery {
            origin,
            service_id: non_blank(req.service_id),
            radius_km: req.radius.unwrap_or(DEFAULT_RADIUS_KM),
            include_distance: req.include_distance.unwrap_or(false),
            sort_by: SortBy::parse_lenient(req.sort_by.as_deref()),
        };
        query.check_radius()?;
        Ok(query)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Result
// ============================================================================

/// Routing data attached to a vendor. Serialized inline on the vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDistance {
    pub distance: f64,
    pub distance_text: Option<String>,
    pub duration: Option<f64>,
    pub duration_text: Option<String>,
    pub distance_status: DistanceStatus,
}

impl From<DistanceResult> for VendorDistance {
    fn from(d: DistanceResult) -> Self {
        Self {
            distance: d.distance_km,
            distance_text: d.distance_text,
            duration: d.duration_min,
            duration_text: d.duration_text,
            distance_status: d.status,
        }
    }
}

/// One vendor in a search result: the vendor record, the store-side
/// distance for proximity searches, and routing fields when requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorMatch {
    #[serde(flatten)]
    pub vendor: Vendor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(flatten)]
    pub distance: Option<VendorDistance>,
}

impl VendorMatch {
    fn listed(vendor: Vendor) -> Self {
        Self {
            vendor,
            distance_km: None,
            distance: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub radius: f64,
    pub service_id: Option<String>,
    pub sort_by: SortBy,
    pub include_distance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorSearchResult {
    /// Vendor records; proximity searches add `distanceKm`, and
    /// `includeDistance` adds `distance`, `distanceText`, `duration`,
    /// `durationText` and `distanceStatus`.
    #[schema(value_type = Vec<Object>)]
    pub vendors: Vec<VendorMatch>,
    pub total: usize,
    pub search_criteria: SearchCriteria,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_location: Option<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct VendorSummary {
    pub id: String,
    pub name: String,
    pub address: VendorAddress,
    pub coordinates: Coordinate,
}

/// Distance from a user to one vendor.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorDistanceReport {
    pub vendor: VendorSummary,
    pub user_location: Coordinate,
    #[serde(flatten)]
    pub distance: DistanceResult,
}

// ============================================================================
// Service
// ============================================================================

#[derive(Clone)]
pub struct VendorProximitySearch {
    resolver: LocationResolver,
    store: Arc<dyn VendorStore>,
}

impl VendorProximitySearch {
    pub fn new(resolver: LocationResolver, store: Arc<dyn VendorStore>) -> Self {
        Self { resolver, store }
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    pub async fn search(&self, query: VendorSearchQuery) -> Result<VendorSearchResult, SearchError> {
        query.check_radius()?;
        let service_id = query.service_id.as_deref();

        let user = match &query.origin {
            SearchOrigin::Coordinate(c) => Some(*c),
            SearchOrigin::PlaceId(place_id) => {
                Some(self.resolver.place_details(place_id).await?.coordinate)
            }
            SearchOrigin::Address(address) => Some(self.resolver.geocode(address).await?.coordinate),
            SearchOrigin::Unfiltered => None,
        };

        let mut matches = match user {
            None => self
                .store
                .find_all(service_id)
                .await?
                .into_iter()
                .map(VendorMatch::listed)
                .collect(),
            Some(center) => {
                let nearby = self
                    .store
                    .find_nearby(center, query.radius_km, service_id)
                    .await?;
                tracing::debug!(
                    "find_nearby({}, {} km) returned {} vendors",
                    center.to_lat_lng_string(),
                    query.radius_km,
                    nearby.len()
                );

                let mut matches: Vec<VendorMatch> = nearby
                    .into_iter()
                    .map(|n| VendorMatch {
                        vendor: n.vendor,
                        distance_km: Some(n.distance_km),
                        distance: None,
                    })
                    .collect();
                if query.include_distance {
                    self.annotate(center, &mut matches).await;
                }
                matches
            }
        };

        sort_matches(&mut matches, query.sort_by);

        let empty = matches.is_empty();
        Ok(VendorSearchResult {
            total: matches.len(),
            vendors: matches,
            search_criteria: SearchCriteria {
                radius: query.radius_km,
                service_id: query.service_id.clone(),
                sort_by: query.sort_by,
                include_distance: query.include_distance,
            },
            user_location: user,
            message: empty.then(|| EMPTY_RESULT_MESSAGE.to_string()),
            suggestions: empty
                .then(|| EMPTY_RESULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()),
        })
    }

    /// Nearby vendors with routing data, nearest first.
    pub async fn nearby_with_distances(
        &self,
        user: Coordinate,
        radius_km: Option<f64>,
        service_id: Option<String>,
    ) -> Result<VendorSearchResult, SearchError> {
        self.search(VendorSearchQuery {
            origin: SearchOrigin::Coordinate(user),
            service_id,
            radius_km: radius_km.unwrap_or(DEFAULT_RADIUS_KM),
            include_distance: true,
            sort_by: SortBy::Distance,
        })
        .await
    }

    pub async fn distance_to_vendor(
        &self,
        user: Coordinate,
        vendor_id: &str,
    ) -> Result<VendorDistanceReport, SearchError> {
        let vendor = self
            .store
            .find_by_id(vendor_id)
            .await?
            .ok_or_else(|| SearchError::VendorNotFound(vendor_id.to_string()))?;

        let distance = self.resolver.calculate_distance(user, vendor.location).await;
        Ok(VendorDistanceReport {
            vendor: VendorSummary {
                coordinates: vendor.location,
                id: vendor.id,
                name: vendor.name,
                address: vendor.address,
            },
            user_location: user,
            distance,
        })
    }

    /// Per-vendor routing calls run concurrently. The resolver never fails,
    /// so one slow or broken call cannot affect its siblings.
    async fn annotate(&self, user: Coordinate, matches: &mut [VendorMatch]) {
        let results = join_all(
            matches
                .iter()
                .map(|m| self.resolver.calculate_distance(user, m.vendor.location)),
        )
        .await;

        for (m, d) in matches.iter_mut().zip(results) {
            m.distance = Some(d.into());
        }
    }
}

/// Stable sort. Distance ordering only applies when routing data is
/// attached; otherwise the incoming order stands.
fn sort_matches(matches: &mut [VendorMatch], sort_by: SortBy) {
    match sort_by {
        SortBy::Rating => matches.sort_by(|a, b| b.vendor.rating.total_cmp(&a.vendor.rating)),
        SortBy::Name => matches.sort_by(|a, b| a.vendor.name.cmp(&b.vendor.name)),
        SortBy::Distance => {
            if matches.iter().all(|m| m.distance.is_some()) {
                matches.sort_by(|a, b| {
                    let da = a.distance.as_ref().map_or(0.0, |d| d.distance);
                    let db = b.distance.as_ref().map_or(0.0, |d| d.distance);
                    da.total_cmp(&db)
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SearchVendorsRequest {
        SearchVendorsRequest::default()
    }

    #[test]
    fn test_sort_by_lenient() {
        assert_eq!(SortBy::parse_lenient(Some("rating")), SortBy::Rating);
        assert_eq!(SortBy::parse_lenient(Some("NAME")), SortBy::Name);
        assert_eq!(SortBy::parse_lenient(Some("price")), SortBy::Distance);
        assert_eq!(SortBy::parse_lenient(None), SortBy::Distance);
    }

    #[test]
    fn test_empty_request_is_unfiltered() {
        let q = VendorSearchQuery::try_from(request()).unwrap();
        assert_eq!(q, VendorSearchQuery::default());
    }

    #[test]
    fn test_origin_precedence() {
        let q = VendorSearchQuery::try_from(SearchVendorsRequest {
            latitude: Some(5.6),
            longitude: Some(-0.19),
            place_id: Some("abc".into()),
            address: Some("Osu".into()),
            ..request()
        })
        .unwrap();
        assert!(matches!(q.origin, SearchOrigin::Coordinate(_)));

        let q = VendorSearchQuery::try_from(SearchVendorsRequest {
            place_id: Some("abc".into()),
            address: Some("Osu".into()),
            ..request()
        })
        .unwrap();
        assert_eq!(q.origin, SearchOrigin::PlaceId("abc".into()));

        let q = VendorSearchQuery::try_from(SearchVendorsRequest {
            address: Some("Osu".into()),
            ..request()
        })
        .unwrap();
        assert_eq!(q.origin, SearchOrigin::Address("Osu".into()));
    }

    #[test]
    fn test_zero_latitude_is_a_real_coordinate() {
        let q = VendorSearchQuery::try_from(SearchVendorsRequest {
            latitude: Some(0.0),
            longitude: Some(0.0),
            ..request()
        })
        .unwrap();
        assert!(matches!(q.origin, SearchOrigin::Coordinate(_)));
    }

    #[test]
    fn test_lone_latitude_rejected() {
        let err = VendorSearchQuery::try_from(SearchVendorsRequest {
            latitude: Some(5.6),
            ..request()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            SearchError::Location(LocationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_out_of_range_coordinate_rejected() {
        let err = VendorSearchQuery::try_from(SearchVendorsRequest {
            latitude: Some(95.0),
            longitude: Some(0.0),
            ..request()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            SearchError::Location(LocationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        for radius in [0.0, -3.0, f64::NAN] {
            let err = VendorSearchQuery::try_from(SearchVendorsRequest {
                radius: Some(radius),
                ..request()
            })
            .unwrap_err();
            assert!(matches!(
                err,
                SearchError::Location(LocationError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_vendor_match_serializes_flat() {
        let vendor: Vendor = serde_yaml::from_str(
            r#"
id: v1
name: Fresh Fold
rating: 4.5
location: { latitude: 5.6037, longitude: -0.187 }
servicesOffered: [wash]
deliveryFee: 10.0
"#,
        )
        .unwrap();

        let listed = serde_json::to_value(VendorMatch::listed(vendor.clone())).unwrap();
        assert_eq!(listed["name"], "Fresh Fold");
        assert!(listed.get("distance").is_none());
        assert!(listed.get("distanceKm").is_none());

        let annotated = VendorMatch {
            vendor,
            distance_km: Some(1.2),
            distance: Some(
                crate::geo::estimate(
                    Coordinate::new(5.6037, -0.187).unwrap(),
                    Coordinate::new(5.604, -0.1875).unwrap(),
                )
                .into(),
            ),
        };
        let json = serde_json::to_value(annotated).unwrap();
        assert_eq!(json["distanceStatus"], "estimated");
        assert_eq!(json["distanceText"], "0.1 km");
        assert!(json["duration"].is_null());
        assert_eq!(json["distanceKm"], 1.2);
    }
}
