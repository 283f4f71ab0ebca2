//! Catalog Service Library
//!
//! Users, family assignments, products with their country settings and
//! videos, and the product status workflow. Embedded in the gateway binary,
//! which wires the services below into its router.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::AppResult;

use crate::config::CatalogServiceConfig;
use crate::infra::{seed_lookup_tables, Database, Persistence, SeedReport};
use crate::service::{
    AssignmentManager, AssignmentService, ProductManager, ProductService, SessionRevoker,
    UserManager, UserService, VideoManager, VideoService,
};

/// Every catalog use case, wired over one connection pool.
#[derive(Clone)]
pub struct CatalogServices {
    pub database: Arc<Database>,
    pub users: Arc<dyn UserService>,
    pub products: Arc<dyn ProductService>,
    pub videos: Arc<dyn VideoService>,
    pub assignments: Arc<dyn AssignmentService>,
}

impl CatalogServices {
    pub fn new(database: Database, revoker: Arc<dyn SessionRevoker>) -> Self {
        let uow = Arc::new(Persistence::new(database.get_connection()));
        Self {
            users: Arc::new(UserManager::new(uow.clone(), revoker)),
            products: Arc::new(ProductManager::new(uow.clone())),
            videos: Arc::new(VideoManager::new(uow.clone())),
            assignments: Arc::new(AssignmentManager::new(uow)),
            database: Arc::new(database),
        }
    }

    /// Connect, apply pending migrations and seed the lookup tables.
    pub async fn bootstrap(
        config: &CatalogServiceConfig,
        revoker: Arc<dyn SessionRevoker>,
    ) -> AppResult<Self> {
        let database = Database::connect(&config.database).await?;
        seed_lookup_tables(database.connection()).await?;
        Ok(Self::new(database, revoker))
    }
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = CatalogServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Seed the lookup tables against the configured database (for CLI commands).
pub async fn seed() -> Result<SeedReport, Box<dyn std::error::Error>> {
    let config = CatalogServiceConfig::from_env();
    let db = Database::connect(&config.database).await?;
    let report = seed_lookup_tables(db.connection()).await?;
    Ok(report)
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
