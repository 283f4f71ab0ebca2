//! User service - directory reads, guarded updates and sign-in bookkeeping.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    permissions, FamilyAssignment, IdentityProfile, Principal, Role, User, UserResponse,
    UserUpdate,
};

use super::session::SessionRevoker;
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Administrators see everyone, other users only themselves
    async fn list_users(&self, actor: Principal) -> AppResult<Vec<UserResponse>>;

    /// Non-administrators asking for someone else get `NotFound`
    async fn get_user(&self, actor: Principal, id: Uuid) -> AppResult<UserResponse>;

    /// Update a user; `is_active` and `role` only apply when an administrator edits someone else
    async fn update_user(
        &self,
        actor: Principal,
        id: Uuid,
        update: UserUpdate,
    ) -> AppResult<UserResponse>;

    /// Unscoped lookup used by the authentication layer
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Create or refresh the user behind a verified identity
    async fn sign_in(&self, profile: IdentityProfile) -> AppResult<User>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    revoker: Arc<dyn SessionRevoker>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, revoker: Arc<dyn SessionRevoker>) -> Self {
        Self { uow, revoker }
    }

    async fn respond(&self, user: User) -> AppResult<UserResponse> {
        let assignments = self.uow.assignments().list_for_user(user.id).await?;
        Ok(UserResponse::new(user, assignments))
    }

    async fn visible_user(&self, actor: &Principal, id: Uuid) -> AppResult<User> {
        if !actor.is_admin() && actor.id != id {
            return Err(AppError::NotFound);
        }
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn ensure_role_exists(&self, code: &str) -> AppResult<()> {
        if Role::from_code(code).is_none() || self.uow.lookups().find_role(code).await?.is_none() {
            return Err(AppError::validation(format!(
                "Role with code '{}' does not exist",
                code
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> UserService for UserManager<U> {
    async fn list_users(&self, actor: Principal) -> AppResult<Vec<UserResponse>> {
        let users = if actor.is_admin() {
            self.uow.users().list().await?
        } else {
            self.uow.users().find_by_id(actor.id).await?.into_iter().collect()
        };

        let ids = users.iter().map(|user| user.id).collect();
        let mut by_user: HashMap<Uuid, Vec<FamilyAssignment>> = HashMap::new();
        for assignment in self.uow.assignments().list_for_users(ids).await? {
            by_user.entry(assignment.user_id).or_default().push(assignment);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let assignments = by_user.remove(&user.id).unwrap_or_default();
                UserResponse::new(user, assignments)
            })
            .collect())
    }

    async fn get_user(&self, actor: Principal, id: Uuid) -> AppResult<UserResponse> {
        let user = self.visible_user(&actor, id).await?;
        self.respond(user).await
    }

    async fn update_user(
        &self,
        actor: Principal,
        id: Uuid,
        update: UserUpdate,
    ) -> AppResult<UserResponse> {
        let current = self.visible_user(&actor, id).await?;

        let update = permissions::guard_user_update(&actor, id, update);
        if let Some(code) = update.role.as_deref() {
            self.ensure_role_exists(code).await?;
        }

        let deactivating = current.is_active && update.is_active == Some(false);
        let user = if update == UserUpdate::default() {
            current
        } else {
            self.uow.users().update(id, update).await?
        };

        if deactivating {
            match self.revoker.revoke_user_sessions(id).await {
                Ok(count) => tracing::info!(user_id = %id, sessions = count, "User deactivated, sessions revoked"),
                Err(e) => tracing::error!(user_id = %id, error = %e, "Failed to revoke sessions of deactivated user"),
            }
        }

        self.respond(user).await
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.uow.users().find_by_id(id).await
    }

    async fn sign_in(&self, profile: IdentityProfile) -> AppResult<User> {
        let users = self.uow.users();
        let user = match users.find_by_google_id(&profile.google_id).await? {
            Some(existing) => {
                users
                    .record_login(existing.id, profile, Role::DefaultUser)
                    .await?
            }
            None => {
                let user = users.create(profile, Role::DefaultUser).await?;
                tracing::info!(user_id = %user.id, email = %user.email, "User registered");
                user
            }
        };
        Ok(user)
    }
}
