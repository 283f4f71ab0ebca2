//! Product loading combined with the permission evaluator.

use common::{AppError, AppResult, OptionExt};
use domain::{permissions, FamilyAssignment, Principal, Product};

use crate::infra::UnitOfWork;

pub(crate) async fn load_for_read<U: UnitOfWork>(
    uow: &U,
    actor: &Principal,
    product_id: i32,
) -> AppResult<Product> {
    permissions::ensure_can_read(actor).map_err(AppError::from)?;
    uow.products().find_by_id(product_id).await?.ok_or_not_found()
}

/// Load the product and the actor's assignments, then require write access.
pub(crate) async fn load_for_write<U: UnitOfWork>(
    uow: &U,
    actor: &Principal,
    product_id: i32,
) -> AppResult<(Product, Vec<FamilyAssignment>)> {
    if !permissions::can_write_generally(actor) {
        return Err(AppError::forbidden(
            "Your role does not allow modifying products",
        ));
    }
    let product = uow.products().find_by_id(product_id).await?.ok_or_not_found()?;
    let assignments = uow.assignments().list_for_user(actor.id).await?;
    permissions::ensure_can_write(actor, &product, &assignments)?;
    Ok((product, assignments))
}
