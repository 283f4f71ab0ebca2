//! Seeded product workflow statuses.

use sea_orm::entity::prelude::*;

use domain::LookupRef;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "statuses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LookupRef {
    fn from(model: Model) -> Self {
        LookupRef {
            id: model.id,
            code: model.code,
            name: model.name,
        }
    }
}
