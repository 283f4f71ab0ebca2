//! Family-assignment store.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use common::AppResult;
use domain::{FamilyAssignment, NewAssignment};

use super::entities::family_assignment::{self, Entity as AssignmentEntity};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FamilyAssignmentRepository: Send + Sync {
    /// Assignments held by one user
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<FamilyAssignment>>;

    /// Assignments held by any of `user_ids`
    async fn list_for_users(&self, user_ids: Vec<Uuid>) -> AppResult<Vec<FamilyAssignment>>;

    /// IDs of users assigned to a subfamily
    async fn user_ids_for_subfamily(&self, subfamily_id: i32) -> AppResult<Vec<Uuid>>;
}

pub struct FamilyAssignmentStore {
    db: DatabaseConnection,
}

impl FamilyAssignmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FamilyAssignmentRepository for FamilyAssignmentStore {
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<FamilyAssignment>> {
        self.list_for_users(vec![user_id]).await
    }

    async fn list_for_users(&self, user_ids: Vec<Uuid>) -> AppResult<Vec<FamilyAssignment>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = AssignmentEntity::find()
            .filter(family_assignment::Column::UserId.is_in(user_ids))
            .order_by_asc(family_assignment::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(FamilyAssignment::from).collect())
    }

    async fn user_ids_for_subfamily(&self, subfamily_id: i32) -> AppResult<Vec<Uuid>> {
        let models = AssignmentEntity::find()
            .filter(family_assignment::Column::SubfamilyId.eq(subfamily_id))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.user_id).collect())
    }
}

/// Transaction-bound assignment writes.
pub struct TxFamilyAssignmentRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxFamilyAssignmentRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Delete every assignment of the user, then insert `items`
    pub async fn replace_for_user(
        &self,
        user_id: Uuid,
        items: Vec<NewAssignment>,
    ) -> AppResult<Vec<FamilyAssignment>> {
        AssignmentEntity::delete_many()
            .filter(family_assignment::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let model = family_assignment::ActiveModel {
                user_id: Set(user_id),
                area_id: Set(item.area_id),
                family_id: Set(item.family_id),
                subfamily_id: Set(item.subfamily_id),
                ..Default::default()
            }
            .insert(self.txn)
            .await?;
            created.push(FamilyAssignment::from(model));
        }

        Ok(created)
    }
}
