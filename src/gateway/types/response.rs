//! API Response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `error_codes`: Standard error code constants
//! - `ApiError`: Every handler error, rendered as an `ApiResponse`

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::location::LocationError;
use crate::vendors::{SearchError, StoreError};

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const BAD_REQUEST: i32 = 1002;

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4004;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    pub const STORE_UNAVAILABLE: i32 = 5002;
    pub const NOT_SUPPORTED: i32 = 5010;
    pub const UPSTREAM_ERROR: i32 = 5020;
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_PARAMETER,
            msg,
        )
    }
}

impl From<LocationError> for ApiError {
    fn from(e: LocationError) -> Self {
        use LocationError::*;
        let (status, code) = match &e {
            InvalidInput(_) => (StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER),
            BadRequest(_) => (StatusCode::BAD_REQUEST, error_codes::BAD_REQUEST),
            NotFound(_) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
            NotSupported(_) => (StatusCode::NOT_IMPLEMENTED, error_codes::NOT_SUPPORTED),
            ServiceUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                error_codes::SERVICE_UNAVAILABLE,
            ),
            Http(_) | UpstreamStatus { .. } | Decode(_) => {
                tracing::error!("Unmapped upstream error reached the gateway: {}", e);
                (StatusCode::BAD_GATEWAY, error_codes::UPSTREAM_ERROR)
            }
        };
        Self::new(status, code, e.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        tracing::error!("Vendor store failure: {}", e);
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::STORE_UNAVAILABLE,
            "Vendor store unavailable",
        )
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::Location(e) => e.into(),
            SearchError::Store(e) => e.into(),
            SearchError::VendorNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.code, self.msg))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let json = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["msg"], "ok");
        assert_eq!(json["data"], 42);
    }

    #[test]
    fn test_error_omits_data() {
        let json = serde_json::to_value(ApiResponse::<()>::error(1001, "bad")).unwrap();
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_location_error_mapping() {
        let e: ApiError = LocationError::not_supported("nope").into();
        assert_eq!(e.status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(e.code, error_codes::NOT_SUPPORTED);

        let e: ApiError = LocationError::not_found("Address not found").into();
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.msg, "Address not found");

        let e: ApiError = LocationError::unavailable("no key").into();
        assert_eq!(e.status, StatusCode::SERVICE_UNAVAILABLE);

        let e: ApiError = LocationError::Decode("x".into()).into();
        assert_eq!(e.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_search_error_mapping() {
        let e: ApiError = SearchError::VendorNotFound("v9".into()).into();
        assert_eq!(e.status, StatusCode::NOT_FOUND);
        assert_eq!(e.code, error_codes::NOT_FOUND);

        let e: ApiError = SearchError::Store(StoreError::Fixture {
            path: "x".into(),
            reason: "y".into(),
        })
        .into();
        assert_eq!(e.code, error_codes::STORE_UNAVAILABLE);
    }
}
