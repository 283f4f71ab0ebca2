//! API Gateway Library
//!
//! The HTTP REST API of the PIM backend. Catalog and authentication services
//! run in-process behind the router.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use auth_service_lib::build_authenticator;
use auth_service_lib::config::AuthServiceConfig;
use auth_service_lib::session::{RedisSessionStore, SessionRevocation, SessionStore};
use catalog_service_lib::config::CatalogServiceConfig;
use catalog_service_lib::CatalogServices;

use crate::config::GatewayConfig;
use crate::handlers::{DatabaseCheck, HealthCheck, SessionStoreCheck};
use crate::routes::{cors_layer, create_router};
use crate::state::AppState;

/// Wire every service and serve HTTP until the process stops.
pub async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let auth_config = AuthServiceConfig::from_env()?;

    // Sessions
    let store = RedisSessionStore::connect(&auth_config.cache).await?;
    let sessions: Arc<dyn SessionStore> = Arc::new(store.clone());
    let revoker = Arc::new(SessionRevocation::new(sessions.clone()));

    // Catalog (migrates and seeds lookup tables)
    let catalog = CatalogServices::bootstrap(&CatalogServiceConfig::from_env(), revoker).await?;

    let auth = build_authenticator(&auth_config, catalog.users.clone(), sessions);
    let checks: Vec<Arc<dyn HealthCheck>> = vec![
        Arc::new(DatabaseCheck::new(catalog.database.clone())),
        Arc::new(SessionStoreCheck::new(store)),
    ];
    let state = AppState::new(&catalog, Arc::new(auth), checks);

    // Build router
    let app = create_router(state)
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
