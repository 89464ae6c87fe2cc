use async_trait::async_trait;
use thiserror::Error;

use super::models::{NearbyVendor, Vendor};
use crate::geo::Coordinate;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to load vendor fixtures from {path}: {reason}")]
    Fixture { path: String, reason: String },
}

/// Read-only query surface over vendor records.
///
/// All queries only return active vendors except `find_by_id`.
#[async_trait]
pub trait VendorStore: Send + Sync {
    /// Vendors within `radius_km` of `center`, nearest first, ties broken
    /// by rating descending.
    async fn find_nearby(
        &self,
        center: Coordinate,
        radius_km: f64,
        service_id: Option<&str>,
    ) -> Result<Vec<NearbyVendor>, StoreError>;

    /// All vendors, rating descending then name ascending.
    async fn find_all(&self, service_id: Option<&str>) -> Result<Vec<Vendor>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Vendor>, StoreError>;
}
