//! Vendor records, stores and proximity search

pub mod memory;
pub mod models;
pub mod postgres;
pub mod search;
pub mod store;

pub use memory::InMemoryVendorStore;
pub use models::{NearbyVendor, Vendor, VendorAddress};
pub use postgres::PgVendorStore;
pub use search::{
    DEFAULT_RADIUS_KM, EMPTY_RESULT_MESSAGE, EMPTY_RESULT_SUGGESTIONS, SearchCriteria,
    SearchError, SearchOrigin, SearchVendorsRequest, SortBy, VendorDistance,
    VendorDistanceReport, VendorMatch, VendorProximitySearch, VendorSearchQuery,
    VendorSearchResult, VendorSummary,
};
pub use store::{StoreError, VendorStore};
