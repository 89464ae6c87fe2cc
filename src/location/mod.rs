//! Location resolution
//!
//! Autocomplete, geocoding, place lookup and routing distance across a closed
//! set of upstream providers, one of which is active per process.

pub mod error;
pub mod provider;
pub mod providers;
pub mod resolver;
pub mod types;

pub use error::LocationError;
pub use provider::LocationProvider;
pub use resolver::{DEFAULT_COUNTRY, LocationResolver};
pub use types::{AddressCandidate, Capabilities, ProviderKind, ResolvedLocation};
