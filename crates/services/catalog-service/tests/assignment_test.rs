//! Family assignment replacement.

mod support;

use catalog_service_lib::service::{AssignmentManager, AssignmentService};
use catalog_service_lib::infra::UnitOfWork;
use common::AppError;
use domain::{AssignmentInput, Role};
use uuid::Uuid;

fn item(subfamily_id: Option<i32>) -> AssignmentInput {
    AssignmentInput {
        area_id: Some(1),
        family_id: Some(10),
        subfamily_id,
    }
}

#[tokio::test]
async fn test_replacement_swaps_the_whole_set() {
    let db = support::setup().await;
    let admin = db.user(Some(Role::Administrator)).await;
    let target = db.user(Some(Role::ProductManager)).await;
    let service = AssignmentManager::new(db.uow.clone());

    service
        .replace_family_assignments(admin, target.id, vec![item(Some(1)), item(Some(2))])
        .await
        .unwrap();
    let created = service
        .replace_family_assignments(admin, target.id, vec![item(Some(3))])
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    let stored = db.uow.assignments().list_for_user(target.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].subfamily_id, 3);
}

#[tokio::test]
async fn test_invalid_item_keeps_previous_assignments() {
    let db = support::setup().await;
    let admin = db.user(Some(Role::Administrator)).await;
    let target = db.user(Some(Role::ProductManager)).await;
    let service = AssignmentManager::new(db.uow.clone());
    service
        .replace_family_assignments(admin, target.id, vec![item(Some(1))])
        .await
        .unwrap();

    let result = service
        .replace_family_assignments(admin, target.id, vec![item(Some(2)), item(None)])
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    let stored = db.uow.assignments().list_for_user(target.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].subfamily_id, 1);
}

#[tokio::test]
async fn test_zero_subfamily_is_rejected_as_missing() {
    let db = support::setup().await;
    let admin = db.user(Some(Role::Administrator)).await;
    let target = db.user(Some(Role::ProductManager)).await;
    let service = AssignmentManager::new(db.uow.clone());
    service
        .replace_family_assignments(admin, target.id, vec![item(Some(1))])
        .await
        .unwrap();

    let result = service
        .replace_family_assignments(admin, target.id, vec![item(Some(0))])
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    let stored = db.uow.assignments().list_for_user(target.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].subfamily_id, 1);
}

#[tokio::test]
async fn test_only_administrators_replace_assignments() {
    let db = support::setup().await;
    let manager = db.user(Some(Role::ProductManager)).await;
    let service = AssignmentManager::new(db.uow.clone());

    let result = service
        .replace_family_assignments(manager, manager.id, vec![item(Some(1))])
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let db = support::setup().await;
    let admin = db.user(Some(Role::Administrator)).await;
    let service = AssignmentManager::new(db.uow.clone());

    let result = service
        .replace_family_assignments(admin, Uuid::new_v4(), vec![item(Some(1))])
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}
