//! Per-country product settings.

use sea_orm::entity::prelude::*;

use domain::ProductCountrySetting;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_countries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub country_code: String,
    pub enabled: bool,
    pub sellable: bool,
    pub category_code: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub category: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub related: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub substitute: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductCountrySetting {
    fn from(model: Model) -> Self {
        ProductCountrySetting {
            id: model.id,
            country_code: model.country_code,
            enabled: model.enabled,
            sellable: model.sellable,
            category_code: model.category_code,
            category: model.category,
            related: model.related,
            substitute: model.substitute,
        }
    }
}
