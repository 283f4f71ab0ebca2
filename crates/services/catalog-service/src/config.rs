//! Catalog service configuration.

use common::DatabaseConfig;

/// Catalog service configuration.
#[derive(Debug, Clone, Default)]
pub struct CatalogServiceConfig {
    pub database: DatabaseConfig,
}

impl CatalogServiceConfig {
    /// Load configuration from `CATALOG_SERVICE_*` variables, falling back to shared ones.
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env("CATALOG_SERVICE"),
        }
    }
}
