//! Health check handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;

use auth_service_lib::session::RedisSessionStore;
use catalog_service_lib::infra::Database;
use common::{AppError, AppResult};

use crate::state::AppState;

/// A backing service the gateway depends on.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &'static str;

    async fn ping(&self) -> AppResult<()>;
}

pub struct DatabaseCheck {
    database: Arc<Database>,
}

impl DatabaseCheck {
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }
}

#[async_trait]
impl HealthCheck for DatabaseCheck {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn ping(&self) -> AppResult<()> {
        self.database.ping().await.map_err(AppError::from)
    }
}

pub struct SessionStoreCheck {
    store: RedisSessionStore,
}

impl SessionStoreCheck {
    pub fn new(store: RedisSessionStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl HealthCheck for SessionStoreCheck {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub services: BTreeMap<&'static str, ServiceHealth>,
}

/// Service health with optional error message.
#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Health check endpoint - pings the database and redis.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let mut services = BTreeMap::new();
    let mut all_healthy = true;

    for check in &state.checks {
        let health = match check.ping().await {
            Ok(()) => ServiceHealth {
                status: "healthy",
                error: None,
            },
            Err(e) => {
                all_healthy = false;
                tracing::warn!(service = check.name(), error = %e, "Health check failed");
                ServiceHealth {
                    status: "unhealthy",
                    error: Some(e.user_message()),
                }
            }
        };
        services.insert(check.name(), health);
    }

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services,
    };

    if all_healthy {
        (StatusCode::OK, Json(response)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
    }
}
