//! Application state for dependency injection.

use std::sync::Arc;

use auth_service_lib::service::AuthService;
use catalog_service_lib::service::{AssignmentService, ProductService, UserService, VideoService};
use catalog_service_lib::CatalogServices;

use crate::handlers::HealthCheck;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserService>,
    pub products: Arc<dyn ProductService>,
    pub videos: Arc<dyn VideoService>,
    pub assignments: Arc<dyn AssignmentService>,
    pub checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        catalog: &CatalogServices,
        auth: Arc<dyn AuthService>,
        checks: Vec<Arc<dyn HealthCheck>>,
    ) -> Self {
        Self {
            auth,
            users: catalog.users.clone(),
            products: catalog.products.clone(),
            videos: catalog.videos.clone(),
            assignments: catalog.assignments.clone(),
            checks,
        }
    }
}
