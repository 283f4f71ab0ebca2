//! Lookup seeding.

mod support;

use catalog_service_lib::infra::seed_lookup_tables;
use catalog_service_lib::repository::entities::{role, status};
use sea_orm::EntityTrait;

#[tokio::test]
async fn test_seeding_twice_creates_no_duplicates() {
    let db = support::setup().await;

    let report = seed_lookup_tables(db.database.connection()).await.unwrap();

    assert_eq!(report.created, 0);
    assert_eq!(report.renamed, 0);
    let statuses = status::Entity::find()
        .all(db.database.connection())
        .await
        .unwrap();
    assert_eq!(statuses.len(), 5);
    let roles = role::Entity::find()
        .all(db.database.connection())
        .await
        .unwrap();
    assert_eq!(roles.len(), 3);
}
