use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResponse, ApiResult};
use crate::vendors::{SearchVendorsRequest, VendorSearchQuery, VendorSearchResult};

/// Search vendors by coordinates, place id or address
///
/// Without any location the full (optionally service-filtered) listing is
/// returned, rating first. An empty result carries a message and
/// suggestions instead of an error.
#[utoipa::path(
    get,
    path = "/api/v1/vendors/search",
    params(SearchVendorsRequest),
    responses(
        (status = 200, description = "Matching vendors", body = ApiResponse<VendorSearchResult>),
        (status = 400, description = "Invalid query"),
        (status = 404, description = "Address or place not found")
    ),
    tag = "Vendors"
)]
pub async fn search_vendors(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SearchVendorsRequest>, QueryRejection>,
) -> ApiResult<VendorSearchResult> {
    let Query(req) = query.map_err(|e| ApiError::invalid(e.body_text()))?;
    let query = VendorSearchQuery::try_from(req)?;
    let result = state.search.search(query).await?;
    Ok(Json(ApiResponse::success(result)))
}
