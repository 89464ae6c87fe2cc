//! Provider selection and uniform fallbacks
//!
//! One provider is bound at startup and never changes. The resolver owns the
//! error policy: transport failures never reach callers in provider-specific
//! shapes, and distance calculation cannot fail.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use super::error::LocationError;
use super::provider::LocationProvider;
use super::providers::{GoogleMapsProvider, MapboxProvider, NominatimProvider};
use super::types::{AddressCandidate, ProviderKind, ResolvedLocation};
use crate::config::LocationConfig;
use crate::geo::{self, Coordinate, DistanceResult};

pub const DEFAULT_COUNTRY: &str = "GH";

const AUTOCOMPLETE_FAILED: &str = "Failed to fetch address suggestions";
const GEOCODE_FAILED: &str = "Failed to geocode address";
const PLACE_DETAILS_FAILED: &str = "Failed to get place details";

#[derive(Clone)]
pub struct LocationResolver {
    provider: Arc<dyn LocationProvider>,
}

impl LocationResolver {
    /// Build the configured provider with a shared HTTP client.
    pub fn from_config(config: &LocationConfig) -> Result<Self, LocationError> {
        let kind = ProviderKind::from_config_value(&config.provider);
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.nominatim_user_agent.as_str())
            .build()?;

        let provider: Arc<dyn LocationProvider> = match kind {
            ProviderKind::Google => Arc::new(GoogleMapsProvider::new(
                client,
                config.google_maps_api_key.clone(),
            )),
            ProviderKind::Mapbox => Arc::new(MapboxProvider::new(
                client,
                config.mapbox_access_token.clone(),
            )),
            ProviderKind::Nominatim => Arc::new(
                NominatimProvider::new(client)
                    .with_default_country(&config.default_country)
                    .with_user_agent(&config.nominatim_user_agent),
            ),
        };

        tracing::info!(
            provider = %kind,
            timeout_secs = config.request_timeout_secs,
            "Location provider initialized"
        );
        Ok(Self { provider })
    }

    pub fn with_provider(provider: Arc<dyn LocationProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    /// Suggestions for a partial address. `country` defaults to Ghana.
    pub async fn autocomplete(
        &self,
        query: &str,
        country: Option<&str>,
    ) -> Result<Vec<AddressCandidate>, LocationError> {
        let query = required(query, "query")?;
        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COUNTRY);

        self.provider
            .autocomplete_address(query, country)
            .await
            .map_err(|e| {
                tracing::warn!("[{}] autocomplete failed: {}", self.provider.kind(), e);
                LocationError::BadRequest(AUTOCOMPLETE_FAILED.into())
            })
    }

    pub async fn geocode(&self, address: &str) -> Result<ResolvedLocation, LocationError> {
        let address = required(address, "address")?;
        self.provider
            .geocode_address(address)
            .await
            .map_err(|e| self.remap(e, GEOCODE_FAILED))
    }

    pub async fn place_details(&self, place_id: &str) -> Result<ResolvedLocation, LocationError> {
        let place_id = required(place_id, "placeId")?;
        let kind = self.provider.kind();
        if !kind.capabilities().place_details {
            return Err(LocationError::not_supported(format!(
                "Place details not supported by the {kind} provider"
            )));
        }
        self.provider
            .place_details(place_id)
            .await
            .map_err(|e| self.remap(e, PLACE_DETAILS_FAILED))
    }

    /// Never fails. Anything the provider lets escape becomes an estimate.
    pub async fn calculate_distance(&self, user: Coordinate, vendor: Coordinate) -> DistanceResult {
        match self.provider.calculate_distance(user, vendor).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    "[{}] distance calculation failed, using estimate: {}",
                    self.provider.kind(),
                    e
                );
                geo::estimate(user, vendor)
            }
        }
    }

    fn remap(&self, err: LocationError, fallback: &str) -> LocationError {
        if err.is_domain_error() {
            return err;
        }
        tracing::warn!("[{}] {}: {}", self.provider.kind(), fallback, err);
        LocationError::BadRequest(fallback.to_string())
    }
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, LocationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LocationError::InvalidInput(format!("{field} is required")));
    }
    Ok(value)
}
