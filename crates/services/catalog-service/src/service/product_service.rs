//! Product service - reads, aggregate updates and status workflow.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, OptionExt};
use domain::{
    permissions, plan_country_settings, plan_transition, Principal, Product, ProductPatch,
    ProductResponse, RelatedUser, Role, StatusChangeRequest, TransitionContext, WorkflowEntry,
};

use super::access::{load_for_read, load_for_write};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list_products(&self, actor: Principal) -> AppResult<Vec<ProductResponse>>;

    async fn get_product(&self, actor: Principal, id: i32) -> AppResult<ProductResponse>;

    /// Update scalar fields and reconcile country settings in one transaction
    async fn update_product(
        &self,
        actor: Principal,
        id: i32,
        patch: ProductPatch,
    ) -> AppResult<ProductResponse>;

    /// Run the status state machine and persist its outcome with history
    async fn apply_status_change(
        &self,
        actor: Principal,
        id: i32,
        request: StatusChangeRequest,
    ) -> AppResult<ProductResponse>;

    /// Workflow history, most recent first
    async fn history(&self, actor: Principal, id: i32) -> AppResult<Vec<WorkflowEntry>>;
}

pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Emails of active, non-administrator users assigned to the subfamily
    async fn related_users(&self, subfamily_code: Option<i32>) -> AppResult<Vec<RelatedUser>> {
        let Some(subfamily) = subfamily_code else {
            return Ok(Vec::new());
        };

        let ids = self.uow.assignments().user_ids_for_subfamily(subfamily).await?;
        let mut users = self.uow.users().find_by_ids(ids).await?;
        users.retain(|user| user.is_active && user.role != Some(Role::Administrator));
        users.sort_by(|a, b| a.email.cmp(&b.email));

        Ok(users
            .into_iter()
            .map(|user| RelatedUser { email: user.email })
            .collect())
    }

    async fn respond(&self, product: Product) -> AppResult<ProductResponse> {
        let related_users = self.related_users(product.subfamily_code).await?;
        Ok(ProductResponse {
            product,
            related_users,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> ProductService for ProductManager<U> {
    async fn list_products(&self, actor: Principal) -> AppResult<Vec<ProductResponse>> {
        permissions::ensure_can_read(&actor)?;
        let products = self.uow.products().list().await?;

        let mut related: HashMap<Option<i32>, Vec<RelatedUser>> = HashMap::new();
        let mut responses = Vec::with_capacity(products.len());
        for product in products {
            let related_users = match related.get(&product.subfamily_code) {
                Some(users) => users.clone(),
                None => {
                    let users = self.related_users(product.subfamily_code).await?;
                    related.insert(product.subfamily_code, users.clone());
                    users
                }
            };
            responses.push(ProductResponse {
                product,
                related_users,
            });
        }
        Ok(responses)
    }

    async fn get_product(&self, actor: Principal, id: i32) -> AppResult<ProductResponse> {
        let product = load_for_read(self.uow.as_ref(), &actor, id).await?;
        self.respond(product).await
    }

    async fn update_product(
        &self,
        actor: Principal,
        id: i32,
        mut patch: ProductPatch,
    ) -> AppResult<ProductResponse> {
        load_for_write(self.uow.as_ref(), &actor, id).await?;
        patch.validate()?;

        let touched = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let products = ctx.products();
                    let mut product = products.find_by_id(id).await?.ok_or_not_found()?;
                    let plan = patch
                        .country_settings
                        .take()
                        .map(|incoming| plan_country_settings(&product.country_settings, incoming))
                        .transpose()?;
                    let touched = plan.as_ref().map(|p| p.touched()).unwrap_or(0);

                    patch.apply_scalars(&mut product);
                    products.save_fields(&product).await?;
                    if let Some(plan) = plan {
                        products.apply_country_settings(product.id, plan).await?;
                    }
                    Ok::<_, AppError>(touched)
                })
            })
            .await?;

        tracing::info!(product_id = id, user_id = %actor.id, country_rows = touched, "Product updated");
        self.get_product(actor, id).await
    }

    async fn apply_status_change(
        &self,
        actor: Principal,
        id: i32,
        request: StatusChangeRequest,
    ) -> AppResult<ProductResponse> {
        let (product, assignments) = load_for_write(self.uow.as_ref(), &actor, id).await?;

        let context = TransitionContext {
            actor: &actor,
            current_status: product.current_status(),
            currently_published: product.published,
            may_request_approval: permissions::can_request_approval(&actor, &product, &assignments),
        };
        let plan = plan_transition(&context, &request)?;

        let old_status_id = product.status.as_ref().map(|status| status.id);
        let new_status_id = match plan.target {
            Some(target) => Some(
                self.uow
                    .lookups()
                    .find_status(target.code())
                    .await?
                    .ok_or_else(|| {
                        AppError::validation(format!(
                            "Status with code '{}' does not exist",
                            target.code()
                        ))
                    })?
                    .id,
            ),
            None => old_status_id,
        };

        let published = plan.published;
        let record = plan.record.clone();
        let user_id = actor.id;
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.products().set_status(id, new_status_id, published).await?;
                    if let Some(record) = record {
                        ctx.workflows()
                            .append(id, user_id, old_status_id, new_status_id, record.message)
                            .await?;
                    }
                    Ok::<_, AppError>(())
                })
            })
            .await?;

        match &plan.record {
            Some(record) => tracing::info!(
                product_id = id,
                user_id = %actor.id,
                from = ?record.from,
                to = %record.to,
                published,
                "Product status changed"
            ),
            None => tracing::debug!(product_id = id, published, "Product publication updated"),
        }

        self.get_product(actor, id).await
    }

    async fn history(&self, actor: Principal, id: i32) -> AppResult<Vec<WorkflowEntry>> {
        load_for_read(self.uow.as_ref(), &actor, id).await?;
        self.uow.workflows().history(id).await
    }
}
