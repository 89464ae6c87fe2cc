//! OpenStreetMap Nominatim adapter
//!
//! Nominatim has no key and no routing. Its usage policy requires a
//! descriptive `User-Agent` on every call, so the adapter sets one on each
//! request regardless of how the client was built.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use super::fetch_json;
use crate::geo::{self, Coordinate, DistanceResult};
use crate::location::error::LocationError;
use crate::location::provider::LocationProvider;
use crate::location::types::{AddressCandidate, ProviderKind, ResolvedLocation};

pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "LaundryServiceApp/1.0";

const SEARCH_LIMIT: &str = "5";

#[derive(Deserialize)]
struct SearchHit {
    #[serde(default)]
    place_id: Option<u64>,
    /// Nominatim returns coordinates as strings.
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<serde_json::Value>,
}

impl SearchHit {
    fn coordinate(&self) -> Result<Coordinate, LocationError> {
        let lat = self
            .lat
            .parse::<f64>()
            .map_err(|e| LocationError::Decode(format!("bad lat '{}': {e}", self.lat)))?;
        let lon = self
            .lon
            .parse::<f64>()
            .map_err(|e| LocationError::Decode(format!("bad lon '{}': {e}", self.lon)))?;
        Coordinate::new(lat, lon).map_err(|e| LocationError::Decode(e.to_string()))
    }

    fn into_candidate(self) -> AddressCandidate {
        let coordinates = self.coordinate().ok();
        let (head, tail) = match self.display_name.split_once(',') {
            Some((head, tail)) => (head.trim().to_string(), tail.trim().to_string()),
            None => (self.display_name.clone(), String::new()),
        };
        AddressCandidate {
            place_id: self.place_id.map(|id| id.to_string()),
            main_text: self.name.filter(|n| !n.is_empty()).unwrap_or(head),
            secondary_text: tail,
            description: self.display_name,
            coordinates,
        }
    }
}

pub struct NominatimProvider {
    client: Client,
    base_url: String,
    default_country: String,
    user_agent: String,
}

impl NominatimProvider {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: NOMINATIM_BASE_URL.to_string(),
            default_country: "gh".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Blank values keep [`DEFAULT_USER_AGENT`].
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        if !user_agent.trim().is_empty() {
            self.user_agent = user_agent.trim().to_string();
        }
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Country used to bias geocoding, which takes no country argument.
    pub fn with_default_country(mut self, country: &str) -> Self {
        self.default_country = country.to_ascii_lowercase();
        self
    }

    async fn search(
        &self,
        query: &str,
        country: &str,
        limit: &str,
        label: &str,
    ) -> Result<Vec<SearchHit>, LocationError> {
        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .header(USER_AGENT, self.user_agent.as_str())
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", limit),
                ("countrycodes", country),
                ("addressdetails", "1"),
            ]);
        fetch_json(request, label).await
    }
}

#[async_trait]
impl LocationProvider for NominatimProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Nominatim
    }

    async fn autocomplete_address(
        &self,
        query: &str,
        country: &str,
    ) -> Result<Vec<AddressCandidate>, LocationError> {
        let country = country.to_ascii_lowercase();
        let hits = self
            .search(query, &country, SEARCH_LIMIT, "nominatim.search")
            .await?;
        Ok(hits.into_iter().map(SearchHit::into_candidate).collect())
    }

    async fn geocode_address(&self, address: &str) -> Result<ResolvedLocation, LocationError> {
        let hit = self
            .search(address, &self.default_country, "1", "nominatim.geocode")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LocationError::not_found("Address not found"))?;

        Ok(ResolvedLocation {
            coordinate: hit.coordinate()?,
            formatted_address: hit.display_name,
            place_id: hit.place_id.map(|id| id.to_string()),
            address_components: hit.address,
        })
    }

    // place_details: trait default (NotSupported, no request)

    async fn calculate_distance(
        &self,
        user: Coordinate,
        vendor: Coordinate,
    ) -> Result<DistanceResult, LocationError> {
        Ok(geo::estimate(user, vendor))
    }
}
