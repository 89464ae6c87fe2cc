//! Geometry primitives: validated coordinates and the haversine estimator.

pub mod coordinate;
pub mod estimator;

pub use coordinate::Coordinate;
pub use estimator::{
    DistanceResult, DistanceStatus, EARTH_RADIUS_KM, estimate, format_km, haversine_km,
};
