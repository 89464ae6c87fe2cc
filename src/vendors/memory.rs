//! In-process vendor store
//!
//! Seeded from a YAML file or a literal list. Proximity uses the same
//! haversine formula as the distance estimator.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use async_trait::async_trait;

use super::models::{NearbyVendor, Vendor};
use super::store::{StoreError, VendorStore};
use crate::geo::{Coordinate, haversine_km};

pub struct InMemoryVendorStore {
    vendors: Vec<Vendor>,
}

impl InMemoryVendorStore {
    pub fn new(vendors: Vec<Vendor>) -> Self {
        Self { vendors }
    }

    /// Load a YAML sequence of vendor records.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let fixture_err = |reason: String| StoreError::Fixture {
            path: path.display().to_string(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| fixture_err(e.to_string()))?;
        let vendors: Vec<Vendor> =
            serde_yaml::from_str(&content).map_err(|e| fixture_err(e.to_string()))?;

        tracing::info!("Loaded {} vendors from {}", vendors.len(), path.display());
        Ok(Self::new(vendors))
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    fn active<'a>(&'a self, service_id: Option<&'a str>) -> impl Iterator<Item = &'a Vendor> + 'a {
        self.vendors
            .iter()
            .filter(|v| v.is_active)
            .filter(move |v| service_id.is_none_or(|s| v.offers(s)))
    }
}

fn by_rating_desc(a: &Vendor, b: &Vendor) -> Ordering {
    b.rating.total_cmp(&a.rating)
}

#[async_trait]
impl VendorStore for InMemoryVendorStore {
    async fn find_nearby(
        &self,
        center: Coordinate,
        radius_km: f64,
        service_id: Option<&str>,
    ) -> Result<Vec<NearbyVendor>, StoreError> {
        let mut out: Vec<NearbyVendor> = self
            .active(service_id)
            .filter_map(|v| {
                let distance_km = haversine_km(center, v.location);
                (distance_km <= radius_km).then(|| NearbyVendor {
                    vendor: v.clone(),
                    distance_km,
                })
            })
            .collect();

        out.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then_with(|| by_rating_desc(&a.vendor, &b.vendor))
        });
        Ok(out)
    }

    async fn find_all(&self, service_id: Option<&str>) -> Result<Vec<Vendor>, StoreError> {
        let mut out: Vec<Vendor> = self.active(service_id).cloned().collect();
        out.sort_by(|a, b| by_rating_desc(a, b).then_with(|| a.name.cmp(&b.name)));
        Ok(out)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Vendor>, StoreError> {
        Ok(self.vendors.iter().find(|v| v.id == id).cloned())
    }
}
