//! Validated WGS84 coordinate

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::location::LocationError;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// A point on the globe in decimal degrees.
///
/// Construction goes through [`Coordinate::new`], so a value of this type is
/// always finite and inside the latitude/longitude ranges. Deserialization
/// applies the same check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Coordinate {
    #[schema(example = 5.6037)]
    latitude: f64,
    #[schema(example = -0.187)]
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        if !latitude.is_finite() || !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(LocationError::InvalidInput(format!(
                "latitude must be within [{MIN_LATITUDE}, {MAX_LATITUDE}], got {latitude}"
            )));
        }
        if !longitude.is_finite() || !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            return Err(LocationError::InvalidInput(format!(
                "longitude must be within [{MIN_LONGITUDE}, {MAX_LONGITUDE}], got {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build from a GeoJSON-style `[lng, lat]` pair.
    pub fn from_lng_lat(pair: [f64; 2]) -> Result<Self, LocationError> {
        Self::new(pair[1], pair[0])
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// `"lat,lng"`, the form routing APIs take for origins/destinations.
    pub fn to_lat_lng_string(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        struct Raw {
            latitude: f64,
            longitude: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Coordinate::new(raw.latitude, raw.longitude).map_err(D::Error::custom)
    }
}
