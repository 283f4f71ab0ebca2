//! Status workflow against a real schema.

mod support;

use catalog_service_lib::infra::UnitOfWork;
use catalog_service_lib::service::{ProductManager, ProductService};
use common::AppError;
use domain::{ProductStatus, Role, StatusChangeRequest};

fn request(code: &str) -> StatusChangeRequest {
    StatusChangeRequest {
        status_code: Some(code.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_admin_publishes_draft_and_history_records_it() {
    let db = support::setup().await;
    let admin = db.user(Some(Role::Administrator)).await;
    let id = db.product("SKU-1", Some(500), ProductStatus::Draft, false).await;
    let service = ProductManager::new(db.uow.clone());

    let updated = service
        .apply_status_change(admin, id, request("published"))
        .await
        .unwrap();

    assert!(updated.product.published);
    assert_eq!(updated.product.current_status(), Some(ProductStatus::Published));

    let history = service.history(admin, id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(
        history[0].old_status.as_ref().map(|s| s.code.as_str()),
        Some("draft")
    );
    assert_eq!(
        history[0].new_status.as_ref().map(|s| s.code.as_str()),
        Some("published")
    );
    assert_eq!(history[0].user.as_ref().map(|u| u.id), Some(admin.id));
}

#[tokio::test]
async fn test_product_manager_cannot_publish_draft() {
    let db = support::setup().await;
    let manager = db.user(Some(Role::ProductManager)).await;
    let id = db.product("SKU-2", Some(500), ProductStatus::Draft, false).await;
    db.uow
        .transaction(move |ctx| {
            Box::pin(async move {
                ctx.assignments()
                    .replace_for_user(
                        manager.id,
                        vec![domain::NewAssignment {
                            area_id: 1,
                            family_id: 10,
                            subfamily_id: 500,
                        }],
                    )
                    .await?;
                Ok::<_, AppError>(())
            })
        })
        .await
        .unwrap();
    let service = ProductManager::new(db.uow.clone());

    let result = service
        .apply_status_change(manager, id, request("published"))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    let history = service.history(manager, id).await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_default_user_status_change_is_forbidden() {
    let db = support::setup().await;
    let user = db.user(Some(Role::DefaultUser)).await;
    let id = db.product("SKU-3", Some(500), ProductStatus::Draft, false).await;
    let service = ProductManager::new(db.uow.clone());

    let result = service.apply_status_change(user, id, request("editing")).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_deactivation_clears_published_flag() {
    let db = support::setup().await;
    let admin = db.user(Some(Role::Administrator)).await;
    let id = db.product("SKU-4", None, ProductStatus::Published, true).await;
    let service = ProductManager::new(db.uow.clone());

    let updated = service
        .apply_status_change(admin, id, request("deactivated"))
        .await
        .unwrap();

    assert!(!updated.product.published);
    assert_eq!(updated.product.current_status(), Some(ProductStatus::Deactivated));
}

#[tokio::test]
async fn test_editing_message_is_kept_in_history() {
    let db = support::setup().await;
    let admin = db.user(Some(Role::Administrator)).await;
    let id = db.product("SKU-5", None, ProductStatus::Draft, false).await;
    let service = ProductManager::new(db.uow.clone());

    service
        .apply_status_change(
            admin,
            id,
            StatusChangeRequest {
                status_code: Some("editing".to_string()),
                message: Some("Needs new photos".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let history = service.history(admin, id).await.unwrap();
    assert_eq!(history[0].message.as_deref(), Some("Needs new photos"));
}

#[tokio::test]
async fn test_status_change_on_missing_product_is_not_found() {
    let db = support::setup().await;
    let admin = db.user(Some(Role::Administrator)).await;
    let service = ProductManager::new(db.uow.clone());

    let result = service.apply_status_change(admin, 9999, request("editing")).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}
