pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

/// Build the complete router. Swagger UI is stateless and merged last.
pub fn build_router(state: Arc<AppState>) -> Router {
    let location_routes = Router::new()
        .route("/autocomplete", get(handlers::autocomplete))
        .route("/geocode", post(handlers::geocode))
        .route("/place-details", get(handlers::place_details))
        .route("/distance", post(handlers::distance))
        .route("/nearby-vendors", get(handlers::nearby_vendors));

    let vendor_routes = Router::new().route("/search", get(handlers::search_vendors));

    Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1/location", location_routes)
        .nest("/api/v1/vendors", vendor_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Bind and serve until the process is stopped.
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> std::io::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        tracing::error!(
            "Failed to bind to {}: {} (port {} may already be in use)",
            addr,
            e,
            port
        );
        e
    })?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    serve(listener, state).await
}

/// Serve on an already-bound listener.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    axum::serve(listener, build_router(state)).await
}
