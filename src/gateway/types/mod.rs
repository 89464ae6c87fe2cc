//! Gateway types module
//!
//! - [`response`]: `ApiResponse<T>`, error codes and `ApiError`
//! - [`request`]: request DTOs for the location endpoints

pub mod request;
pub mod response;

pub use request::{
    AutocompleteQuery, AutocompleteResponse, DistanceRequest, GeocodeRequest, NearbyVendorsQuery,
    PlaceDetailsQuery,
};
pub use response::{ApiError, ApiResponse, ApiResult, error_codes};
