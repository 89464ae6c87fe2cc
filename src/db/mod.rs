//! PostgreSQL connection management

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Schema for the vendor table read by `PgVendorStore`.
pub const VENDORS_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS vendors_tb (
    vendor_id             TEXT PRIMARY KEY,
    name                  TEXT NOT NULL,
    rating                DOUBLE PRECISION NOT NULL DEFAULT 0,
    total_reviews         INTEGER NOT NULL DEFAULT 0,
    latitude              DOUBLE PRECISION NOT NULL,
    longitude             DOUBLE PRECISION NOT NULL,
    street                TEXT NOT NULL DEFAULT '',
    city                  TEXT NOT NULL DEFAULT '',
    region                TEXT NOT NULL DEFAULT '',
    services_offered      TEXT[] NOT NULL DEFAULT '{}',
    is_active             BOOLEAN NOT NULL DEFAULT TRUE,
    is_available          BOOLEAN NOT NULL DEFAULT TRUE,
    delivery_fee          DOUBLE PRECISION NOT NULL DEFAULT 0,
    estimated_pickup_time INTEGER NOT NULL DEFAULT 30
);
CREATE INDEX IF NOT EXISTS idx_vendors_active ON vendors_tb (is_active);
"#;

/// PostgreSQL database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create the vendor table if missing.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(VENDORS_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

/// Extension trait for safe row access with logging
pub trait SafeRow {
    /// Try to get a value from a column, log error and return None if it fails
    fn try_get_log<'r, T>(&'r self, column: &str) -> Option<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>;
}

impl SafeRow for sqlx::postgres::PgRow {
    fn try_get_log<'r, T>(&'r self, column: &str) -> Option<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    {
        use sqlx::Row;
        match self.try_get(column) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::error!("Failed to read column '{}': {}", column, e);
                None
            }
        }
    }
}
