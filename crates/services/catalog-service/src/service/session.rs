//! Token-invalidation hook implemented by the authentication service.

use async_trait::async_trait;
use uuid::Uuid;

use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SessionRevoker: Send + Sync {
    /// Invalidate every live session of the user; returns how many were live.
    async fn revoke_user_sessions(&self, user_id: Uuid) -> AppResult<u64>;
}
