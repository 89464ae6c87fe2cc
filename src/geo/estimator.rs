//! Great-circle distance fallback
//!
//! The estimator has no I/O and cannot fail. Every routing path in the crate
//! falls back to it when a provider has no routing data.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Coordinate;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// How a [`DistanceResult`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DistanceStatus {
    /// Road distance reported by a routing provider.
    Calculated,
    /// Straight-line haversine distance. A lower bound on travel distance.
    Estimated,
}

/// Distance between a user and a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistanceResult {
    #[serde(rename = "distance")]
    pub distance_km: f64,
    pub distance_text: Option<String>,
    #[serde(rename = "duration")]
    pub duration_min: Option<f64>,
    pub duration_text: Option<String>,
    pub status: DistanceStatus,
}

impl DistanceResult {
    pub fn is_estimated(&self) -> bool {
        self.status == DistanceStatus::Estimated
    }
}

/// Haversine distance in kilometers.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lng = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] near antipodes.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Format kilometers the way every provider path renders them: one decimal.
pub fn format_km(distance_km: f64) -> String {
    format!("{distance_km:.1} km")
}

/// Straight-line estimate between two points.
pub fn estimate(a: Coordinate, b: Coordinate) -> DistanceResult {
    let distance_km = haversine_km(a, b);
    DistanceResult {
        distance_km,
        distance_text: Some(format_km(distance_km)),
        duration_min: None,
        duration_text: None,
        status: DistanceStatus::Estimated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_identical_points_are_zero() {
        let accra = c(5.6037, -0.187);
        let r = estimate(accra, accra);
        assert_eq!(r.distance_km, 0.0);
        assert_eq!(r.distance_text.as_deref(), Some("0.0 km"));
    }

    #[test]
    fn test_sub_kilometer_example() {
        let r = estimate(c(5.6037, -0.1870), c(5.6040, -0.1875));
        assert!(r.distance_km > 0.0 && r.distance_km < 1.0);
        assert!((r.distance_km - 0.0646).abs() < 0.001, "got {}", r.distance_km);
        assert_eq!(r.status, DistanceStatus::Estimated);
        assert!(r.duration_min.is_none());
        assert!(r.duration_text.is_none());
    }

    #[test]
    fn test_symmetric() {
        let a = c(5.6037, -0.187);
        let b = c(6.6885, -1.6244);
        let ab = haversine_km(a, b);
        let ba = haversine_km(b, a);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance_accra_kumasi() {
        // ~200 km as the crow flies
        let d = haversine_km(c(5.6037, -0.187), c(6.6885, -1.6244));
        assert!(d > 190.0 && d < 210.0, "got {d}");
    }

    #[test]
    fn test_antipodal_points_are_finite() {
        let pairs = [
            (c(0.0, 0.0), c(0.0, 180.0)),
            (c(90.0, 0.0), c(-90.0, 0.0)),
            (c(45.0, 45.0), c(-45.0, -135.0)),
            (c(10.000000001, 20.0), c(-10.0, -160.0)),
        ];
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        for (a, b) in pairs {
            let d = haversine_km(a, b);
            assert!(d.is_finite());
            assert!(d >= 0.0);
            assert!(d <= half_circumference + 1e-6);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = c(-33.8688, 151.2093);
        let b = c(51.5074, -0.1278);
        assert_eq!(estimate(a, b), estimate(a, b));
    }

    #[test]
    fn test_serializes_with_public_field_names() {
        let json = serde_json::to_value(estimate(c(0.0, 0.0), c(0.0, 1.0))).unwrap();
        assert!(json.get("distance").is_some());
        assert_eq!(json["status"], "estimated");
        assert!(json["duration"].is_null());
        assert!(json["durationText"].is_null());
    }
}
