use async_trait::async_trait;

use super::error::LocationError;
use super::types::{AddressCandidate, ProviderKind, ResolvedLocation};
use crate::geo::{Coordinate, DistanceResult};

/// Uniform interface over geocoding / routing backends
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Which variant this is
    fn kind(&self) -> ProviderKind;

    /// Address suggestions for a partial query.
    ///
    /// Returns an empty list (not an error) when upstream has no results or
    /// the provider is missing its credentials.
    async fn autocomplete_address(
        &self,
        query: &str,
        country: &str,
    ) -> Result<Vec<AddressCandidate>, LocationError>;

    /// Resolve a free-text address to its first match
    async fn geocode_address(&self, address: &str) -> Result<ResolvedLocation, LocationError>;

    /// Resolve a place id previously issued by this same provider.
    ///
    /// Variants without the capability keep this default, which fails
    /// without doing any I/O.
    async fn place_details(&self, place_id: &str) -> Result<ResolvedLocation, LocationError> {
        let _ = place_id;
        Err(LocationError::not_supported(format!(
            "Place details not supported by the {} provider",
            self.kind()
        )))
    }

    /// Travel distance from `user` to `vendor`.
    ///
    /// Adapters fall back to the haversine estimate on routing failures.
    /// Any error that still escapes is absorbed by the resolver.
    async fn calculate_distance(
        &self,
        user: Coordinate,
        vendor: Coordinate,
    ) -> Result<DistanceResult, LocationError>;
}
