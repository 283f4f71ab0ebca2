//! User repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{IdentityProfile, Role, User, UserUpdate};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by Google account ID
    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<User>>;

    /// Find all users whose ID is in `ids`
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>>;

    /// List all users ordered by creation time
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Create a user from a verified identity
    async fn create(&self, profile: IdentityProfile, role: Role) -> AppResult<User>;

    /// Refresh profile fields, stamp `last_login` and give a role to role-less users
    async fn record_login(&self, id: Uuid, profile: IdentityProfile, fallback_role: Role) -> AppResult<User>;

    /// Apply an already guarded update
    async fn update(&self, id: Uuid, update: UserUpdate) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::GoogleId.eq(google_id))
            .one(&self.db)
            .await?;
        Ok(result.map(User::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(&self, profile: IdentityProfile, role: Role) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            google_id: Set(profile.google_id),
            email: Set(profile.email),
            firstname: Set(profile.firstname),
            lastname: Set(profile.lastname),
            full_name: Set(profile.full_name),
            picture: Set(profile.picture),
            locale: Set(profile.locale),
            domain: Set(profile.domain),
            is_active: Set(true),
            role: Set(Some(role.code().to_string())),
            last_login: Set(Some(now)),
            created_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(User::from(model))
    }

    async fn record_login(&self, id: Uuid, profile: IdentityProfile, fallback_role: Role) -> AppResult<User> {
        let model = self.find_model(id).await?;
        let missing_role = model.role.is_none();

        let mut active: ActiveModel = model.into();
        active.email = Set(profile.email);
        active.firstname = Set(profile.firstname);
        active.lastname = Set(profile.lastname);
        active.full_name = Set(profile.full_name);
        active.picture = Set(profile.picture);
        active.locale = Set(profile.locale);
        active.domain = Set(profile.domain);
        active.last_login = Set(Some(Utc::now()));
        if missing_role {
            active.role = Set(Some(fallback_role.code().to_string()));
        }

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }

    async fn update(&self, id: Uuid, update: UserUpdate) -> AppResult<User> {
        let model = self.find_model(id).await?;
        let mut active: ActiveModel = model.into();

        if let Some(email) = update.email {
            active.email = Set(email);
        }
        if let Some(firstname) = update.firstname {
            active.firstname = Set(firstname);
        }
        if let Some(lastname) = update.lastname {
            active.lastname = Set(lastname);
        }
        if let Some(full_name) = update.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(picture) = update.picture {
            active.picture = Set(picture);
        }
        if let Some(locale) = update.locale {
            active.locale = Set(Some(locale));
        }
        if let Some(domain) = update.domain {
            active.domain = Set(Some(domain));
        }
        if let Some(is_active) = update.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(role) = update.role {
            active.role = Set(Some(role));
        }

        let model = active.update(&self.db).await?;
        Ok(User::from(model))
    }
}
