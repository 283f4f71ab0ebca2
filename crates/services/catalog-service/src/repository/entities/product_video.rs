//! YouTube videos attached to a product.

use sea_orm::entity::prelude::*;

use domain::ProductVideo;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_videos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub product_id: i32,
    pub youtube_url: String,
    pub order: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductVideo {
    fn from(model: Model) -> Self {
        ProductVideo {
            id: model.id,
            product_id: model.product_id,
            youtube_url: model.youtube_url,
            order: model.order,
            created_at: model.created_at,
        }
    }
}
