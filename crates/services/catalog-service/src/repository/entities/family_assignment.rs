//! User to subfamily assignments.

use sea_orm::entity::prelude::*;

use domain::FamilyAssignment;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_family_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Uuid,
    pub area_id: i32,
    pub family_id: i32,
    pub subfamily_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for FamilyAssignment {
    fn from(model: Model) -> Self {
        FamilyAssignment {
            id: model.id,
            user_id: model.user_id,
            area_id: model.area_id,
            family_id: model.family_id,
            subfamily_id: model.subfamily_id,
        }
    }
}
