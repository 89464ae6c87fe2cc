use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

use crate::location::providers::nominatim::DEFAULT_USER_AGENT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid config {path}: {reason}")]
    Invalid { path: String, reason: String },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub vendors: VendorStoreConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Geocoding / routing provider settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LocationConfig {
    /// google | mapbox | nominatim
    pub provider: String,
    pub google_maps_api_key: Option<String>,
    pub mapbox_access_token: Option<String>,
    /// Sent on every outbound call; Nominatim rejects anonymous clients.
    pub nominatim_user_agent: String,
    pub default_country: String,
    pub request_timeout_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            provider: "google".to_string(),
            google_maps_api_key: None,
            mapbox_access_token: None,
            nominatim_user_agent: DEFAULT_USER_AGENT.to_string(),
            default_country: "GH".to_string(),
            request_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct VendorStoreConfig {
    /// When set, vendors are read from PostgreSQL instead of fixtures
    pub postgres_url: Option<String>,
    pub fixtures_path: String,
}

impl Default for VendorStoreConfig {
    fn default() -> Self {
        Self {
            postgres_url: None,
            fixtures_path: "./fixtures/vendors.yaml".to_string(),
        }
    }
}

impl AppConfig {
    /// Load `config/{env}.yaml`, then apply environment overrides.
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let mut config = Self::from_file(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_string(),
            reason,
        })?;
        Ok(config)
    }

    /// Reject values that deserialize fine but cannot work at runtime.
    pub fn validate(&self) -> Result<(), String> {
        if self.location.request_timeout_secs == 0 {
            return Err("location.request_timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Secrets and the provider choice usually come from the environment.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("LOCATION_PROVIDER") {
            self.location.provider = v;
        }
        if let Some(v) = lookup("GOOGLE_MAPS_API_KEY") {
            self.location.google_maps_api_key = Some(v);
        }
        if let Some(v) = lookup("MAPBOX_ACCESS_TOKEN") {
            self.location.mapbox_access_token = Some(v);
        }
        if let Some(v) = lookup("DATABASE_URL") {
            self.vendors.postgres_url = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const MINIMAL: &str = r#"
log_level: info
log_dir: ./logs
log_file: laundry_locator.log
use_json: false
rotation: daily
gateway:
  host: 0.0.0.0
  port: 8080
"#;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config = AppConfig::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.location.provider, "google");
        assert_eq!(config.location.request_timeout_secs, 15);
        assert_eq!(config.location.nominatim_user_agent, DEFAULT_USER_AGENT);
        assert!(config.vendors.postgres_url.is_none());
    }

    #[test]
    fn test_location_section() {
        let yaml = format!(
            "{MINIMAL}location:\n  provider: mapbox\n  mapbox_access_token: pk.abc\n"
        );
        let config = AppConfig::from_yaml(&yaml).unwrap();
        assert_eq!(config.location.provider, "mapbox");
        assert_eq!(config.location.mapbox_access_token.as_deref(), Some("pk.abc"));
        assert_eq!(config.location.default_country, "GH");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::from_yaml(MINIMAL).unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("LOCATION_PROVIDER", "nominatim"),
            ("DATABASE_URL", "postgresql://localhost/laundry"),
        ]);
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.location.provider, "nominatim");
        assert_eq!(
            config.vendors.postgres_url.as_deref(),
            Some("postgresql://localhost/laundry")
        );
        assert!(config.location.google_maps_api_key.is_none());
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let yaml = format!("{MINIMAL}location:\n  request_timeout_secs: 0\n");
        let config = AppConfig::from_yaml(&yaml).unwrap();
        assert!(config.validate().is_err());

        let path = std::env::temp_dir().join(format!(
            "laundry_locator_zero_timeout_{}.yaml",
            std::process::id()
        ));
        fs::write(&path, &yaml).unwrap();
        let err = AppConfig::from_file(path.to_str().unwrap()).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_minimal_yaml_is_valid() {
        assert!(AppConfig::from_yaml(MINIMAL).unwrap().validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = AppConfig::from_file("config/does-not-exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
