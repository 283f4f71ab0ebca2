//! Family assignment service.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{validate_assignments, AssignmentInput, FamilyAssignment, Principal};

use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AssignmentService: Send + Sync {
    /// Replace the user's whole assignment set. Administrator only.
    async fn replace_family_assignments(
        &self,
        actor: Principal,
        user_id: Uuid,
        items: Vec<AssignmentInput>,
    ) -> AppResult<Vec<FamilyAssignment>>;
}

pub struct AssignmentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AssignmentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> AssignmentService for AssignmentManager<U> {
    async fn replace_family_assignments(
        &self,
        actor: Principal,
        user_id: Uuid,
        items: Vec<AssignmentInput>,
    ) -> AppResult<Vec<FamilyAssignment>> {
        if !actor.is_admin() {
            return Err(AppError::forbidden(
                "Only administrators can manage family assignments",
            ));
        }
        if self.uow.users().find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let validated = validate_assignments(&items)?;
        let count = validated.len();
        let created = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let created = ctx.assignments().replace_for_user(user_id, validated).await?;
                    Ok::<_, AppError>(created)
                })
            })
            .await?;

        tracing::info!(user_id = %user_id, admin_id = %actor.id, count, "Family assignments replaced");
        Ok(created)
    }
}
