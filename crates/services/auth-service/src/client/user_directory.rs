//! User lookups needed by the authenticator, backed by the catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use catalog_service_lib::service::UserService;
use common::AppResult;
use domain::{IdentityProfile, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find by Google ID and refresh, or register with the default role
    async fn sign_in(&self, profile: IdentityProfile) -> AppResult<User>;
}

/// In-process adapter over the catalog user service.
pub struct CatalogUserDirectory {
    users: Arc<dyn UserService>,
}

impl CatalogUserDirectory {
    pub fn new(users: Arc<dyn UserService>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for CatalogUserDirectory {
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.users.find_user(id).await
    }

    async fn sign_in(&self, profile: IdentityProfile) -> AppResult<User> {
        self.users.sign_in(profile).await
    }
}
