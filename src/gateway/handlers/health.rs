//! Health check handler

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::{ApiResponse, error_codes};
use crate::location::{Capabilities, ProviderKind};

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_i64)]
    pub timestamp_ms: i64,
    /// Active location provider
    pub provider: ProviderKind,
    pub capabilities: Capabilities,
    /// `postgres` or `memory`
    #[schema(example = "memory")]
    pub vendor_store: &'static str,
}

/// Health check endpoint
///
/// Reports the bound location provider and what it can do. When vendors
/// come from PostgreSQL the pool is pinged and a failure yields 503.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = ApiResponse<HealthResponse>, content_type = "application/json"),
        (status = 503, description = "Vendor store unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    if let Some(db) = &state.pg_db {
        if let Err(e) = db.health_check().await {
            tracing::error!("[HEALTH] PostgreSQL ping failed: {}", e);
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    code: error_codes::STORE_UNAVAILABLE,
                    msg: "unavailable".to_string(),
                    data: None,
                }),
            );
        }
    }

    let provider = state.resolver().provider_kind();
    (
        StatusCode::OK,
        Json(ApiResponse::success(HealthResponse {
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            provider,
            capabilities: provider.capabilities(),
            vendor_store: if state.pg_db.is_some() {
                "postgres"
            } else {
                "memory"
            },
        })),
    )
}
