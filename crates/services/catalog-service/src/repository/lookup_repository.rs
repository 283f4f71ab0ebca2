//! Read access to the seeded lookup tables.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use common::AppResult;
use domain::LookupRef;

use super::entities::{role, status};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LookupRepository: Send + Sync {
    async fn find_status(&self, code: &str) -> AppResult<Option<LookupRef>>;

    async fn find_role(&self, code: &str) -> AppResult<Option<LookupRef>>;
}

pub struct LookupStore {
    db: DatabaseConnection,
}

impl LookupStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LookupRepository for LookupStore {
    async fn find_status(&self, code: &str) -> AppResult<Option<LookupRef>> {
        let model = status::Entity::find()
            .filter(status::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        Ok(model.map(LookupRef::from))
    }

    async fn find_role(&self, code: &str) -> AppResult<Option<LookupRef>> {
        let model = role::Entity::find()
            .filter(role::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        Ok(model.map(LookupRef::from))
    }
}
