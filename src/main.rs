//! Laundry Locator gateway
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌──────────────┐    ┌─────────────┐
//! │  Config  │───▶│   Resolver   │───▶│ Vendor Search│───▶│ HTTP (axum) │
//! │  (YAML)  │    │ (1 provider) │    │ (store+dist) │    │  /api/v1/*  │
//! └──────────┘    └──────────────┘    └──────────────┘    └─────────────┘
//! ```
//!
//! Usage: `laundry_locator [--env dev] [--port 8080]`

use std::sync::Arc;

use anyhow::Context;

use laundry_locator::config::AppConfig;
use laundry_locator::db::Database;
use laundry_locator::gateway::{self, state::AppState};
use laundry_locator::location::LocationResolver;
use laundry_locator::logging::init_logging;
use laundry_locator::vendors::{
    InMemoryVendorStore, PgVendorStore, VendorProximitySearch, VendorStore,
};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env).context("loading configuration")?;
    let _log_guard = init_logging(&app_config);

    tracing::info!("Starting laundry_locator in {} mode", env);

    let resolver = LocationResolver::from_config(&app_config.location)
        .context("building location provider")?;

    let (store, pg_db): (Arc<dyn VendorStore>, Option<Arc<Database>>) =
        match &app_config.vendors.postgres_url {
            Some(url) => {
                let db = Arc::new(
                    Database::connect(url)
                        .await
                        .context("connecting to PostgreSQL")?,
                );
                db.ensure_schema().await.context("creating vendor schema")?;
                let store: Arc<dyn VendorStore> = Arc::new(PgVendorStore::new(db.pool().clone()));
                (store, Some(db))
            }
            None => {
                let store: Arc<dyn VendorStore> = Arc::new(
                    InMemoryVendorStore::from_yaml_file(&app_config.vendors.fixtures_path)
                        .context("loading vendor fixtures")?,
                );
                (store, None)
            }
        };

    let state = Arc::new(AppState::new(
        VendorProximitySearch::new(resolver, store),
        pg_db,
    ));

    let port = get_port_override().unwrap_or(app_config.gateway.port);
    gateway::run_server(&app_config.gateway.host, port, state)
        .await
        .context("gateway server")?;
    Ok(())
}
