//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::geo::{Coordinate, DistanceResult, DistanceStatus};
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{AutocompleteResponse, DistanceRequest, GeocodeRequest};
use crate::location::{AddressCandidate, Capabilities, ProviderKind, ResolvedLocation};
use crate::vendors::{
    SearchCriteria, SortBy, Vendor, VendorAddress, VendorDistanceReport, VendorSearchResult,
    VendorSummary,
};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Laundry Locator API",
        version = "1.0.0",
        description = "Address resolution, routing distance and proximity search for laundry vendors."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::location::autocomplete,
        crate::gateway::handlers::location::geocode,
        crate::gateway::handlers::location::place_details,
        crate::gateway::handlers::location::distance,
        crate::gateway::handlers::location::nearby_vendors,
        crate::gateway::handlers::vendors::search_vendors,
    ),
    components(
        schemas(
            HealthResponse,
            ProviderKind,
            Capabilities,
            Coordinate,
            AddressCandidate,
            ResolvedLocation,
            DistanceResult,
            DistanceStatus,
            AutocompleteResponse,
            GeocodeRequest,
            DistanceRequest,
            Vendor,
            VendorAddress,
            VendorSummary,
            VendorDistanceReport,
            SearchCriteria,
            SortBy,
            VendorSearchResult,
        )
    ),
    tags(
        (name = "Location", description = "Autocomplete, geocoding, place details and distance"),
        (name = "Vendors", description = "Vendor proximity search"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Laundry Locator API");
        assert_eq!(spec.info.version, "1.0.0");
    }

    #[test]
    fn test_openapi_json_serializable() {
        let json = ApiDoc::openapi().to_json();
        assert!(json.is_ok());
        assert!(json.unwrap().contains("Laundry Locator API"));
    }

    #[test]
    fn test_endpoints_registered() {
        let paths = ApiDoc::openapi().paths.paths;
        for path in [
            "/api/v1/health",
            "/api/v1/location/autocomplete",
            "/api/v1/location/geocode",
            "/api/v1/location/place-details",
            "/api/v1/location/distance",
            "/api/v1/location/nearby-vendors",
            "/api/v1/vendors/search",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }
}
