//! Product repository: the product aggregate with its country settings.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set,
};

use common::{AppError, AppResult};
use domain::{CountrySettingsPlan, LookupRef, Product, ProductCountrySetting};

use super::entities::{product, product_country, product_type, status};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read access to products.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID with status, type and country settings
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>>;

    /// List all products ordered by ID
    async fn list(&self) -> AppResult<Vec<Product>>;
}

/// Concrete implementation of ProductRepository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        find_product(&self.db, id).await
    }

    async fn list(&self) -> AppResult<Vec<Product>> {
        let models = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;
        hydrate(&self.db, models).await
    }
}

async fn find_product<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<Product>> {
    let Some(model) = product::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    Ok(hydrate(db, vec![model]).await?.pop())
}

/// Attach lookup rows and country settings to product rows.
async fn hydrate<C: ConnectionTrait>(db: &C, models: Vec<product::Model>) -> AppResult<Vec<Product>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let statuses: HashMap<i32, LookupRef> = status::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, LookupRef::from(m)))
        .collect();
    let types: HashMap<i32, LookupRef> = product_type::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|m| (m.id, LookupRef::from(m)))
        .collect();

    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let mut settings: HashMap<i32, Vec<ProductCountrySetting>> = HashMap::new();
    for row in product_country::Entity::find()
        .filter(product_country::Column::ProductId.is_in(ids))
        .order_by_asc(product_country::Column::Id)
        .all(db)
        .await?
    {
        settings
            .entry(row.product_id)
            .or_default()
            .push(ProductCountrySetting::from(row));
    }

    Ok(models
        .into_iter()
        .map(|model| Product {
            status: model.status_id.and_then(|id| statuses.get(&id).cloned()),
            product_type: model.product_type_id.and_then(|id| types.get(&id).cloned()),
            country_settings: settings.remove(&model.id).unwrap_or_default(),
            id: model.id,
            sku: model.sku,
            name: model.name,
            published: model.published,
            description: model.description,
            short_description: model.short_description,
            specifications: model.specifications,
            applications: model.applications,
            brand: model.brand,
            url: model.url,
            area: model.area,
            area_code: model.area_code,
            family: model.family,
            family_code: model.family_code,
            subfamily: model.subfamily,
            subfamily_code: model.subfamily_code,
            created_at: model.created_at,
        })
        .collect())
}

/// Transaction-bound product writes.
pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Product>> {
        find_product(self.txn, id).await
    }

    /// Persist the editable scalar fields of `product`
    pub async fn save_fields(&self, product: &Product) -> AppResult<()> {
        let model = product::Entity::find_by_id(product.id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: product::ActiveModel = model.into();
        active.sku = Set(product.sku.clone());
        active.name = Set(product.name.clone());
        active.description = Set(product.description.clone());
        active.short_description = Set(product.short_description.clone());
        active.specifications = Set(product.specifications.clone());
        active.applications = Set(product.applications.clone());
        active.brand = Set(product.brand.clone());
        active.url = Set(product.url.clone());
        active.update(self.txn).await?;
        Ok(())
    }

    /// Store a status and publication flag
    pub async fn set_status(&self, id: i32, status_id: Option<i32>, published: bool) -> AppResult<()> {
        let model = product::Entity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: product::ActiveModel = model.into();
        active.status_id = Set(status_id);
        active.published = Set(published);
        active.update(self.txn).await?;
        Ok(())
    }

    /// Apply a reconciliation plan. Deletes run first so a code can move
    /// between rows without tripping the unique index.
    pub async fn apply_country_settings(&self, product_id: i32, plan: CountrySettingsPlan) -> AppResult<()> {
        let delete_ids: Vec<i32> = plan.delete.iter().map(|s| s.id).collect();
        if !delete_ids.is_empty() {
            product_country::Entity::delete_many()
                .filter(product_country::Column::ProductId.eq(product_id))
                .filter(product_country::Column::Id.is_in(delete_ids))
                .exec(self.txn)
                .await?;
        }

        for setting in plan.update {
            product_country::ActiveModel {
                id: Set(setting.id),
                product_id: Set(product_id),
                country_code: Set(setting.country_code),
                enabled: Set(setting.enabled),
                sellable: Set(setting.sellable),
                category_code: Set(setting.category_code),
                category: Set(setting.category),
                related: Set(setting.related),
                substitute: Set(setting.substitute),
            }
            .update(self.txn)
            .await?;
        }

        for setting in plan.create {
            product_country::ActiveModel {
                product_id: Set(product_id),
                country_code: Set(setting.country_code),
                enabled: Set(setting.enabled),
                sellable: Set(setting.sellable),
                category_code: Set(setting.category_code),
                category: Set(setting.category),
                related: Set(setting.related),
                substitute: Set(setting.substitute),
                ..Default::default()
            }
            .insert(self.txn)
            .await?;
        }

        Ok(())
    }
}
