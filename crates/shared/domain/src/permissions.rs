//! Role/permission evaluator.
//!
//! Pure decisions over a [`Principal`], the product being touched and the
//! actor's family assignments. First matching rule wins; inactive users are
//! denied everything.

use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::family::{covers_subfamily, FamilyAssignment};
use crate::product::{Product, ProductStatus};
use crate::user::{Principal, Role, UserUpdate};

/// Any active user may read any product.
pub fn can_read(actor: &Principal) -> bool {
    actor.is_active
}

/// View-level write check, before an object is loaded. Product managers are
/// deferred to the object-level check.
pub fn can_write_generally(actor: &Principal) -> bool {
    if !actor.is_active {
        return false;
    }
    match actor.role {
        Some(Role::Administrator) | Some(Role::ProductManager) => true,
        Some(Role::DefaultUser) | None => false,
    }
}

/// Write check when no object is in context (nothing to scope against).
pub fn can_write_without_object(actor: &Principal) -> bool {
    if !actor.is_active {
        return false;
    }
    match actor.role {
        Some(Role::Administrator) => true,
        Some(Role::ProductManager) | Some(Role::DefaultUser) | None => false,
    }
}

/// Object-level write check.
pub fn can_write(actor: &Principal, product: &Product, assignments: &[FamilyAssignment]) -> bool {
    if !actor.is_active {
        return false;
    }
    match actor.role {
        Some(Role::Administrator) => true,
        Some(Role::ProductManager) => product
            .subfamily_code
            .is_some_and(|subfamily| covers_subfamily(assignments, actor.id, subfamily)),
        Some(Role::DefaultUser) | None => false,
    }
}

/// Only a writer that is neither administrator nor default user may ask for
/// approval, and only from draft, editing or deactivated.
pub fn can_request_approval(
    actor: &Principal,
    product: &Product,
    assignments: &[FamilyAssignment],
) -> bool {
    match actor.role {
        Some(Role::Administrator) | Some(Role::DefaultUser) => false,
        Some(Role::ProductManager) | None => {
            can_write(actor, product, assignments)
                && matches!(
                    product.current_status(),
                    Some(ProductStatus::Draft | ProductStatus::Editing | ProductStatus::Deactivated)
                )
        }
    }
}

pub fn ensure_can_read(actor: &Principal) -> DomainResult<()> {
    if can_read(actor) {
        Ok(())
    } else {
        Err(DomainError::forbidden("Inactive users cannot access products"))
    }
}

pub fn ensure_can_write(
    actor: &Principal,
    product: &Product,
    assignments: &[FamilyAssignment],
) -> DomainResult<()> {
    if !can_write_generally(actor) {
        return Err(DomainError::forbidden(
            "Your role does not allow modifying products",
        ));
    }
    if !can_write(actor, product, assignments) {
        return Err(DomainError::forbidden(
            "You are not assigned to this product's subfamily",
        ));
    }
    Ok(())
}

/// Self-modification guard for user updates. Privileged fields are silently
/// dropped when a user edits themself or a non-administrator edits anyone.
pub fn guard_user_update(actor: &Principal, target_id: Uuid, update: UserUpdate) -> UserUpdate {
    if actor.id == target_id || !actor.is_admin() {
        update.without_privileged_fields()
    } else {
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::LookupRef;
    use chrono::Utc;

    fn principal(role: Option<Role>) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            is_active: true,
            role,
        }
    }

    fn product(subfamily_code: Option<i32>, status: ProductStatus) -> Product {
        Product {
            id: 7,
            sku: "SKU-7".into(),
            name: "Angle grinder".into(),
            product_type: None,
            status: Some(LookupRef {
                id: 1,
                code: status.code().into(),
                name: status.code().into(),
            }),
            published: false,
            description: None,
            short_description: None,
            specifications: None,
            applications: None,
            brand: None,
            url: None,
            area: None,
            area_code: None,
            family: None,
            family_code: None,
            subfamily: None,
            subfamily_code,
            created_at: Utc::now(),
            country_settings: Vec::new(),
        }
    }

    fn assignment(user_id: Uuid, subfamily_id: i32) -> FamilyAssignment {
        FamilyAssignment {
            id: 1,
            user_id,
            area_id: 1,
            family_id: 1,
            subfamily_id,
        }
    }

    #[test]
    fn default_user_never_writes() {
        let actor = principal(Some(Role::DefaultUser));
        let target = product(Some(42), ProductStatus::Draft);
        let everything = vec![assignment(actor.id, 42)];

        assert!(can_read(&actor));
        assert!(!can_write_generally(&actor));
        assert!(!can_write(&actor, &target, &everything));
        assert!(!can_request_approval(&actor, &target, &everything));
    }

    #[test]
    fn administrator_writes_anything() {
        let actor = principal(Some(Role::Administrator));
        assert!(can_write(&actor, &product(None, ProductStatus::Published), &[]));
        assert!(can_write_without_object(&actor));
    }

    #[test]
    fn administrator_cannot_request_approval() {
        let actor = principal(Some(Role::Administrator));
        assert!(!can_request_approval(&actor, &product(Some(1), ProductStatus::Draft), &[]));
    }

    #[test]
    fn product_manager_needs_matching_assignment() {
        let actor = principal(Some(Role::ProductManager));
        let target = product(Some(42), ProductStatus::Editing);

        assert!(can_write_generally(&actor));
        assert!(!can_write(&actor, &target, &[assignment(actor.id, 41)]));

        let granted = vec![assignment(actor.id, 41), assignment(actor.id, 42)];
        assert!(can_write(&actor, &target, &granted));
        assert!(can_request_approval(&actor, &target, &granted));
    }

    #[test]
    fn product_manager_denied_without_subfamily() {
        let actor = principal(Some(Role::ProductManager));
        let target = product(None, ProductStatus::Draft);
        assert!(!can_write(&actor, &target, &[assignment(actor.id, 42)]));
    }

    #[test]
    fn product_manager_denied_without_object() {
        assert!(!can_write_without_object(&principal(Some(Role::ProductManager))));
    }

    #[test]
    fn approval_only_from_draft_editing_or_deactivated() {
        let actor = principal(Some(Role::ProductManager));
        let granted = vec![assignment(actor.id, 9)];

        for (status, allowed) in [
            (ProductStatus::Draft, true),
            (ProductStatus::Editing, true),
            (ProductStatus::Deactivated, true),
            (ProductStatus::PendingApproval, false),
            (ProductStatus::Published, false),
        ] {
            assert_eq!(
                can_request_approval(&actor, &product(Some(9), status), &granted),
                allowed,
                "{status}"
            );
        }
    }

    #[test]
    fn null_role_is_denied() {
        let actor = principal(None);
        assert!(!can_write_generally(&actor));
        assert!(!can_write(&actor, &product(Some(1), ProductStatus::Draft), &[assignment(actor.id, 1)]));
    }

    #[test]
    fn inactive_users_are_denied_everything() {
        let actor = Principal {
            is_active: false,
            ..principal(Some(Role::Administrator))
        };
        assert!(!can_read(&actor));
        assert!(!can_write(&actor, &product(Some(1), ProductStatus::Draft), &[]));
        assert!(ensure_can_read(&actor).is_err());
    }

    #[test]
    fn self_update_drops_privileged_fields() {
        let admin = principal(Some(Role::Administrator));
        let update = UserUpdate {
            is_active: Some(false),
            role: Some("default_user".into()),
            ..Default::default()
        };

        let guarded = guard_user_update(&admin, admin.id, update.clone());
        assert_eq!(guarded.is_active, None);
        assert_eq!(guarded.role, None);

        let other = guard_user_update(&admin, Uuid::new_v4(), update.clone());
        assert_eq!(other.is_active, Some(false));

        let manager = principal(Some(Role::ProductManager));
        let by_manager = guard_user_update(&manager, Uuid::new_v4(), update);
        assert_eq!(by_manager.is_active, None);
        assert_eq!(by_manager.role, None);
    }
}
