use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::geo::Coordinate;

/// One autocomplete suggestion.
///
/// `place_id` is only meaningful to the provider that issued it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressCandidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub description: String,
    pub main_text: String,
    pub secondary_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
}

/// Result of a geocode or place-detail lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub formatted_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    /// Provider-specific address breakdown, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub address_components: Option<serde_json::Value>,
}

/// The closed set of supported provider variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Maps Platform: places, geocoding, distance matrix.
    Google,
    /// Mapbox: forward geocoding and driving directions.
    Mapbox,
    /// OpenStreetMap Nominatim: search only.
    Nominatim,
}

/// What a provider variant can do natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub place_details: bool,
    pub routing: bool,
}

impl ProviderKind {
    pub const DEFAULT: ProviderKind = ProviderKind::Google;

    /// Parse a configuration value. Unknown or empty names yield the default
    /// so that a typo never prevents startup.
    pub fn from_config_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "google" => Self::Google,
            "mapbox" => Self::Mapbox,
            "nominatim" => Self::Nominatim,
            other => {
                tracing::warn!(
                    "Unknown location provider '{}', falling back to {}",
                    other,
                    Self::DEFAULT
                );
                Self::DEFAULT
            }
        }
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            Self::Google => Capabilities {
                place_details: true,
                routing: true,
            },
            // Place details are emulated through forward geocoding.
            Self::Mapbox => Capabilities {
                place_details: true,
                routing: true,
            },
            Self::Nominatim => Capabilities {
                place_details: false,
                routing: false,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Mapbox => "mapbox",
            Self::Nominatim => "nominatim",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!(ProviderKind::from_config_value("google"), ProviderKind::Google);
        assert_eq!(ProviderKind::from_config_value(" Mapbox "), ProviderKind::Mapbox);
        assert_eq!(
            ProviderKind::from_config_value("NOMINATIM"),
            ProviderKind::Nominatim
        );
    }

    #[test]
    fn test_unknown_provider_falls_back_to_default() {
        assert_eq!(ProviderKind::from_config_value("here"), ProviderKind::Google);
        assert_eq!(ProviderKind::from_config_value(""), ProviderKind::Google);
    }

    #[test]
    fn test_capability_matrix() {
        assert!(ProviderKind::Google.capabilities().routing);
        assert!(ProviderKind::Mapbox.capabilities().place_details);
        let community = ProviderKind::Nominatim.capabilities();
        assert!(!community.routing);
        assert!(!community.place_details);
    }

    #[test]
    fn test_candidate_serializes_camel_case() {
        let candidate = AddressCandidate {
            place_id: Some("ChIJ123".into()),
            description: "Oxford Street, Accra, Ghana".into(),
            main_text: "Oxford Street".into(),
            secondary_text: "Accra, Ghana".into(),
            coordinates: None,
        };
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["placeId"], "ChIJ123");
        assert_eq!(json["mainText"], "Oxford Street");
        assert!(json.get("coordinates").is_none());
    }
}
