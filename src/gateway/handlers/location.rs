//! Location endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResponse, ApiResult, AutocompleteQuery, AutocompleteResponse, DistanceRequest,
    GeocodeRequest, NearbyVendorsQuery, PlaceDetailsQuery,
};
use super::validated;
use crate::geo::Coordinate;
use crate::location::ResolvedLocation;
use crate::vendors::{VendorDistanceReport, VendorSearchResult};

/// Address autocomplete suggestions
#[utoipa::path(
    get,
    path = "/api/v1/location/autocomplete",
    params(AutocompleteQuery),
    responses(
        (status = 200, description = "Suggestions (possibly empty)", body = ApiResponse<AutocompleteResponse>),
        (status = 400, description = "Missing query or suggestion fetch failed")
    ),
    tag = "Location"
)]
pub async fn autocomplete(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AutocompleteQuery>, QueryRejection>,
) -> ApiResult<AutocompleteResponse> {
    let Query(q) = query.map_err(|e| ApiError::invalid(e.body_text()))?;
    validated(&q)?;

    let predictions = state
        .resolver()
        .autocomplete(&q.query, q.country.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(AutocompleteResponse {
        predictions,
    })))
}

/// Convert an address to coordinates
#[utoipa::path(
    post,
    path = "/api/v1/location/geocode",
    request_body = GeocodeRequest,
    responses(
        (status = 200, description = "Resolved location", body = ApiResponse<ResolvedLocation>),
        (status = 404, description = "Address not found"),
        (status = 503, description = "Provider not configured")
    ),
    tag = "Location"
)]
pub async fn geocode(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GeocodeRequest>, JsonRejection>,
) -> ApiResult<ResolvedLocation> {
    let Json(req) = body.map_err(|e| ApiError::invalid(e.body_text()))?;
    validated(&req)?;

    let location = state.resolver().geocode(&req.address).await?;
    Ok(Json(ApiResponse::success(location)))
}

/// Resolve a place id from autocomplete
#[utoipa::path(
    get,
    path = "/api/v1/location/place-details",
    params(PlaceDetailsQuery),
    responses(
        (status = 200, description = "Resolved location", body = ApiResponse<ResolvedLocation>),
        (status = 404, description = "Place not found"),
        (status = 501, description = "Active provider has no place details")
    ),
    tag = "Location"
)]
pub async fn place_details(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PlaceDetailsQuery>, QueryRejection>,
) -> ApiResult<ResolvedLocation> {
    let Query(q) = query.map_err(|e| ApiError::invalid(e.body_text()))?;
    validated(&q)?;

    let location = state.resolver().place_details(&q.place_id).await?;
    Ok(Json(ApiResponse::success(location)))
}

/// Distance from the user to one vendor
#[utoipa::path(
    post,
    path = "/api/v1/location/distance",
    request_body = DistanceRequest,
    responses(
        (status = 200, description = "Routed or estimated distance", body = ApiResponse<VendorDistanceReport>),
        (status = 404, description = "Vendor not found")
    ),
    tag = "Location"
)]
pub async fn distance(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DistanceRequest>, JsonRejection>,
) -> ApiResult<VendorDistanceReport> {
    let Json(req) = body.map_err(|e| ApiError::invalid(e.body_text()))?;
    validated(&req)?;

    let user = Coordinate::new(req.user_latitude, req.user_longitude)?;
    let report = state.search.distance_to_vendor(user, &req.vendor_id).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// Nearby vendors with distances, nearest first
#[utoipa::path(
    get,
    path = "/api/v1/location/nearby-vendors",
    params(NearbyVendorsQuery),
    responses(
        (status = 200, description = "Vendors with distance fields", body = ApiResponse<VendorSearchResult>),
        (status = 400, description = "Invalid coordinates or radius")
    ),
    tag = "Location"
)]
pub async fn nearby_vendors(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NearbyVendorsQuery>, QueryRejection>,
) -> ApiResult<VendorSearchResult> {
    let Query(q) = query.map_err(|e| ApiError::invalid(e.body_text()))?;
    validated(&q)?;

    let user = Coordinate::new(q.latitude, q.longitude)?;
    let result = state
        .search
        .nearby_with_distances(user, q.radius, q.service_id)
        .await?;
    Ok(Json(ApiResponse::success(result)))
}
