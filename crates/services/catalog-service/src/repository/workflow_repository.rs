//! Workflow history log. Entries are appended, never updated.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use common::AppResult;
use domain::{LookupRef, WorkflowActor, WorkflowEntry};

use super::entities::{product_workflow, status, user};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Entries for a product, most recent first
    async fn history(&self, product_id: i32) -> AppResult<Vec<WorkflowEntry>>;
}

pub struct WorkflowStore {
    db: DatabaseConnection,
}

impl WorkflowStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkflowRepository for WorkflowStore {
    async fn history(&self, product_id: i32) -> AppResult<Vec<WorkflowEntry>> {
        let entries = product_workflow::Entity::find()
            .filter(product_workflow::Column::ProductId.eq(product_id))
            .order_by_desc(product_workflow::Column::CreatedAt)
            .order_by_desc(product_workflow::Column::Id)
            .all(&self.db)
            .await?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let statuses: HashMap<i32, LookupRef> = status::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| (m.id, LookupRef::from(m)))
            .collect();

        let user_ids: Vec<Uuid> = entries.iter().map(|e| e.user_id).collect();
        let actors: HashMap<Uuid, WorkflowActor> = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| {
                (
                    m.id,
                    WorkflowActor {
                        id: m.id,
                        email: m.email,
                        full_name: m.full_name,
                        picture: m.picture,
                    },
                )
            })
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| WorkflowEntry {
                id: entry.id,
                product_id: entry.product_id,
                user: actors.get(&entry.user_id).cloned(),
                old_status: entry.old_status_id.and_then(|id| statuses.get(&id).cloned()),
                new_status: entry.new_status_id.and_then(|id| statuses.get(&id).cloned()),
                message: entry.message,
                created_at: entry.created_at,
            })
            .collect())
    }
}

/// Transaction-bound history writes.
pub struct TxWorkflowRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxWorkflowRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Append one entry and return its ID
    pub async fn append(
        &self,
        product_id: i32,
        user_id: Uuid,
        old_status_id: Option<i32>,
        new_status_id: Option<i32>,
        message: Option<String>,
    ) -> AppResult<i32> {
        let model = product_workflow::ActiveModel {
            product_id: Set(product_id),
            user_id: Set(user_id),
            old_status_id: Set(old_status_id),
            new_status_id: Set(new_status_id),
            message: Set(message),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.txn)
        .await?;
        Ok(model.id)
    }
}
