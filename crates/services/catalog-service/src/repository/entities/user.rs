//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Role, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub google_id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub full_name: String,
    pub picture: String,
    pub locale: Option<String>,
    pub domain: Option<String>,
    pub is_active: bool,
    /// Role code (NULL = no role)
    pub role: Option<String>,
    pub last_login: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            google_id: model.google_id,
            email: model.email,
            firstname: model.firstname,
            lastname: model.lastname,
            full_name: model.full_name,
            picture: model.picture,
            locale: model.locale,
            domain: model.domain,
            is_active: model.is_active,
            role: model.role.as_deref().and_then(Role::from_code),
            last_login: model.last_login,
            created_at: model.created_at,
        }
    }
}
