//! Product database entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub sku: String,
    pub name: String,
    pub product_type_id: Option<i32>,
    pub status_id: Option<i32>,
    pub published: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub short_description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub specifications: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub applications: Option<String>,
    pub brand: Option<String>,
    pub url: Option<String>,
    pub area: Option<String>,
    pub area_code: Option<i32>,
    pub family: Option<String>,
    pub family_code: Option<i32>,
    pub subfamily: Option<String>,
    pub subfamily_code: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
