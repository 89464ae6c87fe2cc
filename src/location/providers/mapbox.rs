//! Mapbox adapter
//!
//! Forward geocoding backs autocomplete, geocode and place details (Mapbox has
//! no separate details endpoint, so a feature id is re-geocoded). Distance
//! uses the driving directions API.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{fetch_json, non_empty};
use crate::geo::{self, Coordinate, DistanceResult, DistanceStatus, format_km};
use crate::location::error::LocationError;
use crate::location::provider::LocationProvider;
use crate::location::types::{AddressCandidate, ProviderKind, ResolvedLocation};

pub const MAPBOX_BASE_URL: &str = "https://api.mapbox.com";

const AUTOCOMPLETE_LIMIT: &str = "5";

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    id: String,
    text: String,
    place_name: String,
    /// `[lng, lat]`
    center: [f64; 2],
    #[serde(default)]
    context: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Deserialize)]
struct Route {
    /// meters
    distance: f64,
    /// seconds
    duration: f64,
}

pub struct MapboxProvider {
    client: Client,
    access_token: Option<String>,
    base_url: String,
}

impl MapboxProvider {
    pub fn new(client: Client, access_token: Option<String>) -> Self {
        let access_token = non_empty(access_token);
        if access_token.is_none() {
            tracing::warn!("[mapbox] MAPBOX_ACCESS_TOKEN not set, lookups will be unavailable");
        }
        Self {
            client,
            access_token,
            base_url: MAPBOX_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn require_token(&self) -> Result<&str, LocationError> {
        self.access_token
            .as_deref()
            .ok_or_else(|| LocationError::unavailable("Mapbox access token not configured"))
    }

    /// `{base}/{prefix...}/{last}` with `last` percent-encoded as one segment.
    fn endpoint(&self, prefix: &[&str], last: &str) -> Result<Url, LocationError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| LocationError::unavailable(format!("invalid Mapbox base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| LocationError::unavailable("invalid Mapbox base URL"))?
            .pop_if_empty()
            .extend(prefix)
            .push(last);
        Ok(url)
    }

    async fn forward_geocode(
        &self,
        search: &str,
        params: &[(&str, &str)],
        label: &str,
    ) -> Result<Vec<Feature>, LocationError> {
        let token = self.require_token()?;
        let url = self.endpoint(
            &["geocoding", "v5", "mapbox.places"],
            &format!("{search}.json"),
        )?;
        let request = self
            .client
            .get(url)
            .query(&[("access_token", token)])
            .query(params);
        let body: FeatureCollection = match fetch_json(request, label).await {
            Ok(body) => body,
            Err(LocationError::UpstreamStatus {
                status: 401 | 403, ..
            }) => {
                tracing::warn!("[{}] access token rejected", label);
                return Err(LocationError::unavailable("Mapbox access token rejected"));
            }
            Err(e) => return Err(e),
        };
        Ok(body.features)
    }

    async fn route(
        &self,
        token: &str,
        user: Coordinate,
        vendor: Coordinate,
    ) -> Result<DistanceResult, LocationError> {
        let waypoints = format!(
            "{},{};{},{}",
            user.longitude(),
            user.latitude(),
            vendor.longitude(),
            vendor.latitude()
        );
        let url = self.endpoint(&["directions", "v5", "mapbox", "driving"], &waypoints)?;
        let request = self
            .client
            .get(url)
            .query(&[("access_token", token), ("geometries", "geojson")]);
        let body: DirectionsResponse = fetch_json(request, "mapbox.directions").await?;

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| LocationError::Decode("directions returned no routes".into()))?;

        let distance_km = route.distance / 1000.0;
        let duration_min = route.duration / 60.0;
        Ok(DistanceResult {
            distance_km,
            distance_text: Some(format_km(distance_km)),
            duration_min: Some(duration_min),
            duration_text: Some(format!("{} mins", duration_min.round())),
            status: DistanceStatus::Calculated,
        })
    }
}

fn into_resolved(feature: Feature) -> Result<ResolvedLocation, LocationError> {
    let coordinate =
        Coordinate::from_lng_lat(feature.center).map_err(|e| LocationError::Decode(e.to_string()))?;
    Ok(ResolvedLocation {
        coordinate,
        formatted_address: feature.place_name,
        place_id: Some(feature.id),
        address_components: feature.context,
    })
}

/// `place_name` minus the leading `"{text}, "` segment.
fn secondary_text(place_name: &str, text: &str) -> String {
    place_name
        .strip_prefix(&format!("{text}, "))
        .unwrap_or(place_name)
        .trim()
        .to_string()
}

#[async_trait]
impl LocationProvider for MapboxProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Mapbox
    }

    async fn autocomplete_address(
        &self,
        query: &str,
        country: &str,
    ) -> Result<Vec<AddressCandidate>, LocationError> {
        if self.access_token.is_none() {
            return Ok(Vec::new());
        }

        let country = country.to_ascii_lowercase();
        let features = match self
            .forward_geocode(
                query,
                &[
                    ("country", country.as_str()),
                    ("types", "address,poi"),
                    ("limit", AUTOCOMPLETE_LIMIT),
                ],
                "mapbox.autocomplete",
            )
            .await
        {
            Ok(features) => features,
            Err(LocationError::ServiceUnavailable(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        Ok(features
            .into_iter()
            .map(|f| AddressCandidate {
                secondary_text: secondary_text(&f.place_name, &f.text),
                coordinates: Coordinate::from_lng_lat(f.center).ok(),
                place_id: Some(f.id),
                description: f.place_name,
                main_text: f.text,
            })
            .collect())
    }

    async fn geocode_address(&self, address: &str) -> Result<ResolvedLocation, LocationError> {
        let feature = self
            .forward_geocode(address, &[("limit", "1")], "mapbox.geocode")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LocationError::not_found("Address not found"))?;
        into_resolved(feature)
    }

    async fn place_details(&self, place_id: &str) -> Result<ResolvedLocation, LocationError> {
        let feature = self
            .forward_geocode(place_id, &[], "mapbox.details")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LocationError::not_found("Place not found"))?;
        into_resolved(feature)
    }

    async fn calculate_distance(
        &self,
        user: Coordinate,
        vendor: Coordinate,
    ) -> Result<DistanceResult, LocationError> {
        let Some(token) = self.access_token.as_deref() else {
            return Ok(geo::estimate(user, vendor));
        };

        match self.route(token, user, vendor).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!("[mapbox] routing failed, using estimate: {}", e);
                Ok(geo::estimate(user, vendor))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> MapboxProvider {
        MapboxProvider::new(Client::new(), Some("pk.test".into())).with_base_url(server.uri())
    }

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn osu_feature() -> serde_json::Value {
        serde_json::json!({
            "id": "address.123",
            "text": "Oxford Street",
            "place_name": "Oxford Street, Osu, Accra, Ghana",
            "center": [-0.1817, 5.556]
        })
    }

    #[test]
    fn test_secondary_text() {
        assert_eq!(
            secondary_text("Oxford Street, Osu, Accra, Ghana", "Oxford Street"),
            "Osu, Accra, Ghana"
        );
        assert_eq!(secondary_text("Accra", "Kumasi"), "Accra");
        assert_eq!(
            secondary_text("Oxford Streetside, Osu", "Oxford Street"),
            "Oxford Streetside, Osu"
        );
    }

    #[tokio::test]
    async fn test_rejected_token_degrades_like_missing_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(
                serde_json::json!({"message": "Not Authorized - Invalid Token"}),
            ))
            .expect(3)
            .mount(&server)
            .await;
        let p = MapboxProvider::new(Client::new(), Some("pk.revoked".into()))
            .with_base_url(server.uri());

        assert!(p.autocomplete_address("osu", "GH").await.unwrap().is_empty());
        let err = p.geocode_address("Osu").await.unwrap_err();
        assert!(matches!(err, LocationError::ServiceUnavailable(_)));
        let err = p.place_details("address.123").await.unwrap_err();
        assert!(matches!(err, LocationError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_forbidden_token_through_resolver_is_unavailable() {
        use crate::location::LocationResolver;
        use std::sync::Arc;

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        let p = MapboxProvider::new(Client::new(), Some("pk.revoked".into()))
            .with_base_url(server.uri());
        let resolver = LocationResolver::with_provider(Arc::new(p));

        let err = resolver.geocode("Osu").await.unwrap_err();
        assert!(matches!(err, LocationError::ServiceUnavailable(_)));
        assert!(resolver.autocomplete("osu", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_distance_without_token_is_estimate_and_offline() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let p = MapboxProvider::new(Client::new(), None).with_base_url(server.uri());

        let (user, vendor) = (c(5.6037, -0.187), c(5.62, -0.17));
        let r = p.calculate_distance(user, vendor).await.unwrap();
        assert_eq!(r, geo::estimate(user, vendor));
    }

    #[tokio::test]
    async fn test_autocomplete_encodes_query_and_lowercases_country() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocoding/v5/mapbox.places/oxford%20st.json"))
            .and(query_param("country", "gh"))
            .and(query_param("types", "address,poi"))
            .and(query_param("limit", "5"))
            .and(query_param("access_token", "pk.test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"features": [osu_feature()]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let out = provider(&server)
            .autocomplete_address("oxford st", "GH")
            .await
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].main_text, "Oxford Street");
        assert_eq!(out[0].secondary_text, "Osu, Accra, Ghana");
        assert_eq!(out[0].coordinates, Some(c(5.556, -0.1817)));
    }

    #[tokio::test]
    async fn test_autocomplete_without_token_is_empty() {
        let p = MapboxProvider::new(Client::new(), None);
        assert!(p.autocomplete_address("x", "GH").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_geocode_center_is_lng_lat() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocoding/v5/mapbox.places/Osu.json"))
            .and(query_param("limit", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"features": [osu_feature()]})),
            )
            .mount(&server)
            .await;

        let loc = provider(&server).geocode_address("Osu").await.unwrap();
        assert_eq!(loc.coordinate.latitude(), 5.556);
        assert_eq!(loc.coordinate.longitude(), -0.1817);
        assert_eq!(loc.place_id.as_deref(), Some("address.123"));
    }

    #[tokio::test]
    async fn test_geocode_no_features_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"features": []})),
            )
            .mount(&server)
            .await;

        let err = provider(&server).geocode_address("nowhere").await.unwrap_err();
        assert!(matches!(err, LocationError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_geocode_without_token_is_unavailable() {
        let p = MapboxProvider::new(Client::new(), Some(String::new()));
        let err = p.geocode_address("Osu").await.unwrap_err();
        assert!(matches!(err, LocationError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_place_details_regeocodes_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/geocoding/v5/mapbox.places/address.123.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"features": [osu_feature()]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let loc = provider(&server).place_details("address.123").await.unwrap();
        assert_eq!(loc.formatted_address, "Oxford Street, Osu, Accra, Ghana");
    }

    #[tokio::test]
    async fn test_directions_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/directions/v5/mapbox/driving/-0.187,5.6037;-0.17,5.62"))
            .and(query_param("geometries", "geojson"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "routes": [{"distance": 3456.0, "duration": 610.0}]
            })))
            .mount(&server)
            .await;

        let r = provider(&server)
            .calculate_distance(c(5.6037, -0.187), c(5.62, -0.17))
            .await
            .unwrap();
        assert_eq!(r.status, DistanceStatus::Calculated);
        assert_eq!(r.distance_text.as_deref(), Some("3.5 km"));
        assert_eq!(r.duration_text.as_deref(), Some("10 mins"));
    }

    #[tokio::test]
    async fn test_directions_failure_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let r = provider(&server)
            .calculate_distance(c(5.6037, -0.187), c(5.62, -0.17))
            .await
            .unwrap();
        assert!(r.is_estimated());
        assert!(r.duration_min.is_none());
    }
}
