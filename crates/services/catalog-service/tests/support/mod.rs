//! Shared fixtures: a migrated and seeded in-memory SQLite database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use catalog_service_lib::infra::{seed_lookup_tables, Database, Persistence};
use catalog_service_lib::repository::entities::{product, product_country, status, user};
use catalog_service_lib::service::SessionRevoker;
use common::{AppResult, DatabaseConfig};
use domain::{Principal, ProductStatus, Role};

pub struct TestDb {
    pub database: Database,
    pub uow: Arc<Persistence>,
}

pub async fn setup() -> TestDb {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let database = Database::connect(&config).await.expect("migrate sqlite");
    seed_lookup_tables(database.connection())
        .await
        .expect("seed lookups");
    let uow = Arc::new(Persistence::new(database.get_connection()));
    TestDb { database, uow }
}

impl TestDb {
    pub async fn user(&self, role: Option<Role>) -> Principal {
        self.user_with(role, true).await
    }

    pub async fn user_with(&self, role: Option<Role>, is_active: bool) -> Principal {
        let id = Uuid::new_v4();
        user::ActiveModel {
            id: Set(id),
            google_id: Set(format!("g-{}", id)),
            email: Set(format!("{}@example.com", id)),
            firstname: Set("Ana".to_string()),
            lastname: Set("Lopez".to_string()),
            full_name: Set("Ana Lopez".to_string()),
            picture: Set(String::new()),
            locale: Set(None),
            domain: Set(None),
            is_active: Set(is_active),
            role: Set(role.map(|r| r.code().to_string())),
            last_login: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(self.database.connection())
        .await
        .expect("insert user");

        Principal { id, is_active, role }
    }

    pub async fn status_id(&self, status: ProductStatus) -> i32 {
        status::Entity::find()
            .filter(status::Column::Code.eq(status.code()))
            .one(self.database.connection())
            .await
            .expect("query status")
            .expect("seeded status")
            .id
    }

    pub async fn product(
        &self,
        sku: &str,
        subfamily_code: Option<i32>,
        status: ProductStatus,
        published: bool,
    ) -> i32 {
        let status_id = self.status_id(status).await;
        product::ActiveModel {
            sku: Set(sku.to_string()),
            name: Set(format!("Product {}", sku)),
            product_type_id: Set(None),
            status_id: Set(Some(status_id)),
            published: Set(published),
            description: Set(None),
            short_description: Set(None),
            specifications: Set(None),
            applications: Set(None),
            brand: Set(None),
            url: Set(None),
            area: Set(None),
            area_code: Set(Some(1)),
            family: Set(None),
            family_code: Set(Some(10)),
            subfamily: Set(None),
            subfamily_code: Set(subfamily_code),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.database.connection())
        .await
        .expect("insert product")
        .id
    }

    pub async fn country(&self, product_id: i32, code: &str, category: &str) {
        product_country::ActiveModel {
            product_id: Set(product_id),
            country_code: Set(code.to_string()),
            enabled: Set(true),
            sellable: Set(true),
            category_code: Set(None),
            category: Set(Some(category.to_string())),
            related: Set(None),
            substitute: Set(String::new()),
            ..Default::default()
        }
        .insert(self.database.connection())
        .await
        .expect("insert country setting");
    }
}

/// Session revoker that records the users it was asked about.
#[derive(Default)]
pub struct RecordingRevoker {
    pub revoked: Mutex<Vec<Uuid>>,
}

#[async_trait]
impl SessionRevoker for RecordingRevoker {
    async fn revoke_user_sessions(&self, user_id: Uuid) -> AppResult<u64> {
        let mut revoked = self.revoked.lock().expect("revoker lock");
        revoked.push(user_id);
        Ok(1)
    }
}
