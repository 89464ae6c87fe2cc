pub mod health;
pub mod location;
pub mod vendors;

pub use health::{HealthResponse, health_check};
pub use location::{autocomplete, distance, geocode, nearby_vendors, place_details};
pub use vendors::search_vendors;

use validator::Validate;

use super::types::ApiError;

/// Run `validator` rules, flattening the report into one message.
pub(crate) fn validated<T: Validate>(value: &T) -> Result<(), ApiError> {
    value
        .validate()
        .map_err(|e| ApiError::invalid(e.to_string().replace('\n', "; ")))
}
