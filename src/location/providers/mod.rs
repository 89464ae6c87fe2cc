//! Provider adapters, one per upstream API
//!
//! Every adapter owns a cloned `reqwest::Client` and a base URL that tests
//! point at a local mock server. Calls are single-attempt.

pub mod google;
pub mod mapbox;
pub mod nominatim;

pub use google::GoogleMapsProvider;
pub use mapbox::MapboxProvider;
pub use nominatim::NominatimProvider;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use super::error::LocationError;

/// Send a request and decode a JSON body, treating non-2xx as an error.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    label: &str,
) -> Result<T, LocationError> {
    let response = request.send().await.map_err(|e| {
        tracing::debug!("[{}] request failed: {}", label, e);
        LocationError::Http(e)
    })?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        tracing::debug!("[{}] non-success status {}: {}", label, status, text);
        return Err(LocationError::UpstreamStatus {
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str(&text).map_err(|e| {
        tracing::error!("[{}] failed to parse response: {}. Body: {}", label, e, text);
        LocationError::Decode(e.to_string())
    })
}

/// Drop empty strings so `Some("")` in config behaves like an absent key.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
