//! Product status state machine.
//!
//! [`plan_transition`] runs the guards in a fixed order and returns what must
//! be persisted. It never touches storage: the caller resolves the target
//! status row and writes the product and history entry atomically.

use serde::Deserialize;

use crate::error::{DomainError, DomainResult};
use crate::product::ProductStatus;
use crate::user::{Principal, Role};

/// Requested status change. `status_code` is free text and may name no status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusChangeRequest {
    pub status_code: Option<String>,
    pub published: Option<bool>,
    pub message: Option<String>,
}

/// Facts about the product and actor the guards depend on.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub actor: &'a Principal,
    pub current_status: Option<ProductStatus>,
    pub currently_published: bool,
    pub may_request_approval: bool,
}

/// Outcome of a successful plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    /// Status to store, when one was requested
    pub target: Option<ProductStatus>,
    /// Resulting `published` flag
    pub published: bool,
    /// History entry to append, when the status actually changes
    pub record: Option<TransitionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRecord {
    pub from: Option<ProductStatus>,
    pub to: ProductStatus,
    /// Kept only for transitions into editing
    pub message: Option<String>,
}

pub fn plan_transition(
    ctx: &TransitionContext<'_>,
    request: &StatusChangeRequest,
) -> DomainResult<StatusTransition> {
    if request.status_code.is_none() && request.published.is_none() {
        return Err(DomainError::validation(
            "No valid fields were provided for update",
        ));
    }

    let is_admin = ctx.actor.is_admin();
    let target = request
        .status_code
        .as_deref()
        .and_then(ProductStatus::from_code);
    let current = ctx.current_status;

    if request.published == Some(false) && ctx.currently_published && !is_admin {
        return Err(DomainError::forbidden(
            "Only administrators can unpublish a product",
        ));
    }

    if target == Some(ProductStatus::Editing)
        && current == Some(ProductStatus::PendingApproval)
        && !is_admin
    {
        return Err(DomainError::forbidden(
            "Only administrators can reject an approval request",
        ));
    }

    if target == Some(ProductStatus::PendingApproval) && !ctx.may_request_approval {
        return Err(DomainError::forbidden(
            "You cannot request approval for this product in its current status",
        ));
    }

    if request.published == Some(true) || target == Some(ProductStatus::Published) {
        if !is_admin {
            return Err(DomainError::forbidden(
                "Only administrators can publish a product",
            ));
        }
        if target == Some(ProductStatus::Published) {
            let publishable = matches!(
                current,
                Some(
                    ProductStatus::PendingApproval
                        | ProductStatus::Draft
                        | ProductStatus::Editing
                        | ProductStatus::Deactivated
                )
            );
            if !publishable {
                return Err(DomainError::validation(format!(
                    "Cannot publish a product whose status is '{}'",
                    current.map(|s| s.code()).unwrap_or("none")
                )));
            }
            if request.published == Some(false) {
                return Err(DomainError::validation(
                    "Cannot move to published while unpublishing",
                ));
            }
        }
    }

    if target == Some(ProductStatus::Editing)
        && current == Some(ProductStatus::Published)
        && ctx.actor.has_role(Role::DefaultUser)
    {
        return Err(DomainError::forbidden(
            "Default users cannot send a published product back to editing",
        ));
    }

    if let Some(code) = request.status_code.as_deref() {
        if target.is_none() {
            return Err(DomainError::validation(format!(
                "Status with code '{}' does not exist",
                code
            )));
        }
    }

    let mut published = request.published.unwrap_or(ctx.currently_published);
    if target == Some(ProductStatus::Published) {
        published = true;
    }

    let resulting = target.or(current);
    if target == Some(ProductStatus::Deactivated) {
        published = false;
    } else if published && resulting == Some(ProductStatus::Deactivated) {
        return Err(DomainError::validation(
            "A deactivated product cannot be published",
        ));
    }

    let record = target.filter(|to| Some(*to) != current).map(|to| TransitionRecord {
        from: current,
        to,
        message: match to {
            ProductStatus::Editing => request
                .message
                .clone()
                .filter(|message| !message.trim().is_empty()),
            _ => None,
        },
    });

    Ok(StatusTransition {
        target,
        published,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn actor(role: Role) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            is_active: true,
            role: Some(role),
        }
    }

    fn ctx(actor: &Principal, current: ProductStatus, published: bool) -> TransitionContext<'_> {
        TransitionContext {
            actor,
            current_status: Some(current),
            currently_published: published,
            may_request_approval: false,
        }
    }

    fn to(code: &str) -> StatusChangeRequest {
        StatusChangeRequest {
            status_code: Some(code.into()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_request_is_rejected() {
        let admin = actor(Role::Administrator);
        let err = plan_transition(&ctx(&admin, ProductStatus::Draft, false), &Default::default())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn admin_publishes_draft() {
        let admin = actor(Role::Administrator);
        let plan = plan_transition(&ctx(&admin, ProductStatus::Draft, false), &to("published")).unwrap();

        assert_eq!(plan.target, Some(ProductStatus::Published));
        assert!(plan.published);
        let record = plan.record.unwrap();
        assert_eq!(record.from, Some(ProductStatus::Draft));
        assert_eq!(record.to, ProductStatus::Published);
    }

    #[test]
    fn non_admin_cannot_publish() {
        for role in [Role::ProductManager, Role::DefaultUser] {
            let user = actor(role);
            let by_status = plan_transition(&ctx(&user, ProductStatus::Draft, false), &to("published"));
            assert!(matches!(by_status, Err(DomainError::Forbidden(_))));

            let by_flag = plan_transition(
                &ctx(&user, ProductStatus::Editing, false),
                &StatusChangeRequest {
                    published: Some(true),
                    ..Default::default()
                },
            );
            assert!(matches!(by_flag, Err(DomainError::Forbidden(_))));
        }
    }

    #[test]
    fn publishing_from_published_is_invalid() {
        let admin = actor(Role::Administrator);
        let err = plan_transition(&ctx(&admin, ProductStatus::Published, true), &to("published"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn only_admin_unpublishes() {
        let manager = actor(Role::ProductManager);
        let request = StatusChangeRequest {
            published: Some(false),
            ..Default::default()
        };
        let err = plan_transition(&ctx(&manager, ProductStatus::Published, true), &request).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let admin = actor(Role::Administrator);
        let plan = plan_transition(&ctx(&admin, ProductStatus::Published, true), &request).unwrap();
        assert!(!plan.published);
        assert_eq!(plan.record, None);
    }

    #[test]
    fn rejecting_approval_is_admin_only() {
        let manager = actor(Role::ProductManager);
        let err = plan_transition(&ctx(&manager, ProductStatus::PendingApproval, false), &to("editing"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn requesting_approval_needs_permission() {
        let manager = actor(Role::ProductManager);
        let denied = plan_transition(&ctx(&manager, ProductStatus::Editing, false), &to("pending_approval"));
        assert!(matches!(denied, Err(DomainError::Forbidden(_))));

        let allowed = TransitionContext {
            may_request_approval: true,
            ..ctx(&manager, ProductStatus::Editing, false)
        };
        let plan = plan_transition(&allowed, &to("pending_approval")).unwrap();
        assert_eq!(plan.target, Some(ProductStatus::PendingApproval));
        assert!(plan.record.is_some());
    }

    #[test]
    fn default_user_cannot_reopen_published() {
        let user = actor(Role::DefaultUser);
        let err = plan_transition(&ctx(&user, ProductStatus::Published, true), &to("editing")).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn unknown_status_is_invalid() {
        let admin = actor(Role::Administrator);
        let err = plan_transition(&ctx(&admin, ProductStatus::Draft, false), &to("archived")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("archived")));
    }

    #[test]
    fn deactivation_unpublishes() {
        let admin = actor(Role::Administrator);
        let request = StatusChangeRequest {
            status_code: Some("deactivated".into()),
            published: Some(true),
            message: None,
        };
        let plan = plan_transition(&ctx(&admin, ProductStatus::Published, true), &request).unwrap();
        assert_eq!(plan.target, Some(ProductStatus::Deactivated));
        assert!(!plan.published);
    }

    #[test]
    fn deactivated_product_cannot_be_published_by_flag() {
        let admin = actor(Role::Administrator);
        let request = StatusChangeRequest {
            published: Some(true),
            ..Default::default()
        };
        let err = plan_transition(&ctx(&admin, ProductStatus::Deactivated, false), &request).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn published_never_coexists_with_deactivated() {
        let admin = actor(Role::Administrator);
        for current in ProductStatus::ALL {
            for published in [false, true] {
                for code in ProductStatus::ALL.iter().map(|s| Some(s.code())).chain([None]) {
                    for flag in [None, Some(false), Some(true)] {
                        let request = StatusChangeRequest {
                            status_code: code.map(str::to_string),
                            published: flag,
                            message: None,
                        };
                        if let Ok(plan) = plan_transition(&ctx(&admin, current, published), &request) {
                            let resulting = plan.target.unwrap_or(current);
                            assert!(
                                !(plan.published && resulting == ProductStatus::Deactivated),
                                "{current} -> {resulting} published"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn message_kept_only_for_editing() {
        let admin = actor(Role::Administrator);
        let with_message = |code: &str| StatusChangeRequest {
            status_code: Some(code.into()),
            published: None,
            message: Some("Fix the dimensions".into()),
        };

        let editing = plan_transition(&ctx(&admin, ProductStatus::PendingApproval, false), &with_message("editing"))
            .unwrap();
        assert_eq!(
            editing.record.unwrap().message.as_deref(),
            Some("Fix the dimensions")
        );

        let deactivated = plan_transition(&ctx(&admin, ProductStatus::Draft, false), &with_message("deactivated"))
            .unwrap();
        assert_eq!(deactivated.record.unwrap().message, None);
    }

    #[test]
    fn same_status_records_nothing() {
        let admin = actor(Role::Administrator);
        let plan = plan_transition(&ctx(&admin, ProductStatus::Editing, false), &to("editing")).unwrap();
        assert_eq!(plan.record, None);
    }
}
