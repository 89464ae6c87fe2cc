use std::sync::Arc;

use crate::db::Database;
use crate::location::LocationResolver;
use crate::vendors::VendorProximitySearch;

/// Shared gateway state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub search: VendorProximitySearch,
    /// Present only when vendors come from PostgreSQL
    pub pg_db: Option<Arc<Database>>,
}

impl AppState {
    pub fn new(search: VendorProximitySearch, pg_db: Option<Arc<Database>>) -> Self {
        Self { search, pg_db }
    }

    pub fn resolver(&self) -> &LocationResolver {
        self.search.resolver()
    }
}
