use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geo::Coordinate;

pub const DEFAULT_PICKUP_MINUTES: u32 = 30;

/// Vendor record as the store returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub rating: f64,
    #[serde(default)]
    pub total_reviews: u32,
    pub location: Coordinate,
    #[serde(default)]
    pub address: VendorAddress,
    pub services_offered: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub delivery_fee: f64,
    /// Minutes
    #[serde(default = "default_pickup")]
    pub estimated_pickup_time: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VendorAddress {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
}

/// A vendor returned by a proximity query, with the store-side
/// great-circle distance from the query center.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyVendor {
    pub vendor: Vendor,
    pub distance_km: f64,
}

impl Vendor {
    pub fn offers(&self, service_id: &str) -> bool {
        self.services_offered.iter().any(|s| s == service_id)
    }
}

fn default_true() -> bool {
    true
}

fn default_pickup() -> u32 {
    DEFAULT_PICKUP_MINUTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_defaults() {
        let yaml = r#"
id: v1
name: Fresh Fold
rating: 4.5
location: { latitude: 5.6037, longitude: -0.187 }
servicesOffered: [wash-fold]
deliveryFee: 10.0
"#;
        let v: Vendor = serde_yaml::from_str(yaml).unwrap();
        assert!(v.is_active);
        assert!(v.is_available);
        assert_eq!(v.total_reviews, 0);
        assert_eq!(v.estimated_pickup_time, DEFAULT_PICKUP_MINUTES);
        assert!(v.offers("wash-fold"));
        assert!(!v.offers("dry-clean"));
    }

    #[test]
    fn test_rejects_invalid_location() {
        let yaml = r#"
id: v1
name: Nowhere
rating: 1.0
location: { latitude: 123.0, longitude: 0.0 }
servicesOffered: []
deliveryFee: 0.0
"#;
        assert!(serde_yaml::from_str::<Vendor>(yaml).is_err());
    }
}
