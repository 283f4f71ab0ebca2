//! User directory: visibility, guarded updates and sign-in.

mod support;

use std::sync::Arc;

use catalog_service_lib::service::{UserManager, UserService};
use common::AppError;
use domain::{IdentityProfile, Role, UserUpdate};

use support::RecordingRevoker;

fn manager(db: &support::TestDb) -> (UserManager<catalog_service_lib::infra::Persistence>, Arc<RecordingRevoker>) {
    let revoker = Arc::new(RecordingRevoker::default());
    (UserManager::new(db.uow.clone(), revoker.clone()), revoker)
}

#[tokio::test]
async fn test_self_deactivation_is_ignored() {
    let db = support::setup().await;
    let user = db.user(Some(Role::ProductManager)).await;
    let (service, revoker) = manager(&db);

    let updated = service
        .update_user(
            user,
            user.id,
            UserUpdate {
                is_active: Some(false),
                role: Some("administrator".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.is_active);
    assert_eq!(updated.role, Some(Role::ProductManager));
    assert!(revoker.revoked.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_deactivation_revokes_sessions() {
    let db = support::setup().await;
    let admin = db.user(Some(Role::Administrator)).await;
    let target = db.user(Some(Role::DefaultUser)).await;
    let (service, revoker) = manager(&db);

    let updated = service
        .update_user(
            admin,
            target.id,
            UserUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(!updated.is_active);
    assert_eq!(*revoker.revoked.lock().unwrap(), vec![target.id]);
}

#[tokio::test]
async fn test_admin_sets_role_by_code() {
    let db = support::setup().await;
    let admin = db.user(Some(Role::Administrator)).await;
    let target = db.user(None).await;
    let (service, _) = manager(&db);

    let updated = service
        .update_user(
            admin,
            target.id,
            UserUpdate {
                role: Some("product_manager".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.role, Some(Role::ProductManager));

    let unknown = service
        .update_user(
            admin,
            target.id,
            UserUpdate {
                role: Some("superuser".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(unknown, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_non_admin_sees_only_themself() {
    let db = support::setup().await;
    let user = db.user(Some(Role::DefaultUser)).await;
    let other = db.user(Some(Role::DefaultUser)).await;
    let (service, _) = manager(&db);

    let listed = service.list_users(user).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, user.id);

    let result = service.get_user(user, other.id).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_sign_in_creates_then_refreshes_user() {
    let db = support::setup().await;
    let (service, _) = manager(&db);
    let profile = IdentityProfile {
        google_id: "google-123".to_string(),
        email: "ana@example.com".to_string(),
        firstname: "Ana".to_string(),
        lastname: "Lopez".to_string(),
        full_name: "Ana Lopez".to_string(),
        ..Default::default()
    };

    let created = service.sign_in(profile.clone()).await.unwrap();
    assert_eq!(created.role, Some(Role::DefaultUser));
    assert!(created.is_active);

    let refreshed = service
        .sign_in(IdentityProfile {
            picture: "https://example.com/ana.png".to_string(),
            ..profile
        })
        .await
        .unwrap();
    assert_eq!(refreshed.id, created.id);
    assert_eq!(refreshed.picture, "https://example.com/ana.png");
}
