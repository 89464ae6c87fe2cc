//! Google Maps Platform adapter
//!
//! Uses Places Autocomplete, Geocoding, Place Details and the Distance Matrix.
//! Google reports most failures as HTTP 200 with a `status` field, so every
//! response is checked at both levels.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{fetch_json, non_empty};
use crate::geo::{self, Coordinate, DistanceResult, DistanceStatus};
use crate::location::error::LocationError;
use crate::location::provider::LocationProvider;
use crate::location::types::{AddressCandidate, ProviderKind, ResolvedLocation};

pub const GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
const STATUS_NOT_FOUND: &str = "NOT_FOUND";
const STATUS_REQUEST_DENIED: &str = "REQUEST_DENIED";

// --- Response shapes ---

#[derive(Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Prediction {
    place_id: String,
    description: String,
    structured_formatting: StructuredFormatting,
}

#[derive(Deserialize)]
struct StructuredFormatting {
    main_text: String,
    #[serde(default)]
    secondary_text: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<PlaceResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct PlaceResult {
    geometry: Geometry,
    formatted_address: String,
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    address_components: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Deserialize)]
struct MatrixRow {
    elements: Vec<MatrixElement>,
}

#[derive(Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Deserialize)]
struct TextValue {
    text: String,
    value: f64,
}

// --- Provider ---

pub struct GoogleMapsProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GoogleMapsProvider {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key: non_empty(api_key),
            base_url: GOOGLE_MAPS_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn require_key(&self) -> Result<&str, LocationError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| LocationError::unavailable("Google Maps API key not configured"))
    }

    async fn route(
        &self,
        api_key: &str,
        user: Coordinate,
        vendor: Coordinate,
    ) -> Result<DistanceResult, LocationError> {
        let origins = user.to_lat_lng_string();
        let destinations = vendor.to_lat_lng_string();
        let request = self
            .client
            .get(format!("{}/distancematrix/json", self.base_url))
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("units", "metric"),
                ("mode", "driving"),
                ("key", api_key),
            ]);
        let matrix: DistanceMatrixResponse = fetch_json(request, "google.distancematrix").await?;

        if matrix.status != STATUS_OK {
            return Err(LocationError::UpstreamStatus {
                status: 200,
                body: matrix.status,
            });
        }

        let element = matrix
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| LocationError::Decode("distance matrix had no elements".into()))?;

        if element.status != STATUS_OK {
            return Err(LocationError::UpstreamStatus {
                status: 200,
                body: element.status,
            });
        }

        let (Some(distance), Some(duration)) = (element.distance, element.duration) else {
            return Err(LocationError::Decode(
                "distance matrix element missing distance or duration".into(),
            ));
        };

        Ok(DistanceResult {
            distance_km: distance.value / 1000.0,
            distance_text: Some(distance.text),
            duration_min: Some(duration.value / 60.0),
            duration_text: Some(duration.text),
            status: DistanceStatus::Calculated,
        })
    }
}

fn into_resolved(result: PlaceResult) -> Result<ResolvedLocation, LocationError> {
    let coordinate = Coordinate::new(result.geometry.location.lat, result.geometry.location.lng)
        .map_err(|e| LocationError::Decode(e.to_string()))?;
    Ok(ResolvedLocation {
        coordinate,
        formatted_address: result.formatted_address,
        place_id: result.place_id,
        address_components: result.address_components,
    })
}

fn status_error(status: String, error_message: Option<String>) -> LocationError {
    if status == STATUS_REQUEST_DENIED {
        return LocationError::unavailable("Google Maps API key rejected");
    }
    LocationError::UpstreamStatus {
        status: 200,
        body: match error_message {
            Some(msg) => format!("{status}: {msg}"),
            None => status,
        },
    }
}

#[async_trait]
impl LocationProvider for GoogleMapsProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    async fn autocomplete_address(
        &self,
        query: &str,
        country: &str,
    ) -> Result<Vec<AddressCandidate>, LocationError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };

        let components = format!("country:{country}");
        let request = self
            .client
            .get(format!("{}/place/autocomplete/json", self.base_url))
            .query(&[
                ("input", query),
                ("components", components.as_str()),
                ("types", "address"),
                ("key", api_key),
            ]);
        let body: AutocompleteResponse = fetch_json(request, "google.autocomplete").await?;

        match body.status.as_str() {
            STATUS_OK | STATUS_ZERO_RESULTS => {}
            STATUS_REQUEST_DENIED => {
                tracing::warn!("[google] autocomplete denied, check GOOGLE_MAPS_API_KEY");
                return Ok(Vec::new());
            }
            _ => return Err(status_error(body.status, None)),
        }

        Ok(body
            .predictions
            .into_iter()
            .map(|p| AddressCandidate {
                place_id: Some(p.place_id),
                description: p.description,
                main_text: p.structured_formatting.main_text,
                secondary_text: p.structured_formatting.secondary_text.unwrap_or_default(),
                coordinates: None,
            })
            .collect())
    }

    async fn geocode_address(&self, address: &str) -> Result<ResolvedLocation, LocationError> {
        let api_key = self.require_key()?;
        let request = self
            .client
            .get(format!("{}/geocode/json", self.base_url))
            .query(&[("address", address), ("key", api_key)]);
        let body: GeocodeResponse = fetch_json(request, "google.geocode").await?;

        match body.status.as_str() {
            STATUS_OK | STATUS_ZERO_RESULTS => {}
            _ => return Err(status_error(body.status, body.error_message)),
        }

        let first = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| LocationError::not_found("Address not found"))?;
        into_resolved(first)
    }

    async fn place_details(&self, place_id: &str) -> Result<ResolvedLocation, LocationError> {
        let api_key = self.require_key()?;
        let request = self
            .client
            .get(format!("{}/place/details/json", self.base_url))
            .query(&[
                ("place_id", place_id),
                ("fields", "geometry,formatted_address,address_components"),
                ("key", api_key),
            ]);
        let body: DetailsResponse = fetch_json(request, "google.details").await?;

        match body.status.as_str() {
            STATUS_OK => {}
            STATUS_NOT_FOUND | STATUS_ZERO_RESULTS | "INVALID_REQUEST" => {
                return Err(LocationError::not_found("Place not found"));
            }
            _ => return Err(status_error(body.status, body.error_message)),
        }

        let result = body
            .result
            .ok_or_else(|| LocationError::not_found("Place not found"))?;
        let mut resolved = into_resolved(result)?;
        resolved.place_id.get_or_insert_with(|| place_id.to_string());
        Ok(resolved)
    }

    async fn calculate_distance(
        &self,
        user: Coordinate,
        vendor: Coordinate,
    ) -> Result<DistanceResult, LocationError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(geo::estimate(user, vendor));
        };

        match self.route(api_key, user, vendor).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!("[google] routing failed, using estimate: {}", e);
                Ok(geo::estimate(user, vendor))
            }
        }
    }
}
