//! Laundry Locator - location resolution and vendor proximity search
//!
//! # Modules
//!
//! - [`geo`] - Validated coordinates and the haversine distance estimator
//! - [`location`] - Geocoding / routing providers behind one resolver
//! - [`vendors`] - Vendor records, stores and proximity search
//! - [`gateway`] - HTTP API (axum) and OpenAPI docs
//! - [`config`] - YAML configuration with environment overrides
//! - [`logging`] - tracing subscriber setup
//! - [`db`] - PostgreSQL pool

pub mod config;
pub mod db;
pub mod gateway;
pub mod geo;
pub mod location;
pub mod logging;
pub mod vendors;

// Convenient re-exports at crate root
pub use geo::{Coordinate, DistanceResult, DistanceStatus};
pub use location::{LocationError, LocationProvider, LocationResolver, ProviderKind};
pub use vendors::{
    InMemoryVendorStore, PgVendorStore, SearchError, VendorProximitySearch, VendorSearchQuery,
    VendorSearchResult, VendorStore,
};
