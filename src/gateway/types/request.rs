//! Request DTOs for `/api/v1/location/*`
//!
//! Vendor search takes [`SearchVendorsRequest`](crate::vendors::SearchVendorsRequest)
//! directly.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::location::AddressCandidate;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AutocompleteQuery {
    /// Partial address typed by the user
    #[validate(length(min = 1, max = 200))]
    pub query: String,
    /// ISO 3166-1 alpha-2 country code (default GH)
    #[validate(length(equal = 2))]
    pub country: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AutocompleteResponse {
    pub predictions: Vec<AddressCandidate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GeocodeRequest {
    /// Full address to geocode
    #[validate(length(min = 1, max = 500))]
    #[schema(example = "Oxford Street, Osu, Accra")]
    pub address: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PlaceDetailsQuery {
    /// Place id from autocomplete
    #[validate(length(min = 1, max = 512))]
    pub place_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistanceRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    #[schema(example = 5.6037)]
    pub user_latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    #[schema(example = -0.187)]
    pub user_longitude: f64,
    #[validate(length(min = 1, max = 128))]
    pub vendor_id: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NearbyVendorsQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// Search radius in km (default 10)
    pub radius: Option<f64>,
    #[validate(length(min = 1, max = 128))]
    pub service_id: Option<String>,
}
