//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ROLE_ADMINISTRATOR, ROLE_DEFAULT_USER, ROLE_PRODUCT_MANAGER};
use crate::family::FamilyAssignment;

/// User roles enumeration. A user without a role is `Option::<Role>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Role {
    Administrator,
    ProductManager,
    DefaultUser,
}

impl Role {
    /// Stable code stored in the roles lookup table
    pub fn code(&self) -> &'static str {
        match self {
            Role::Administrator => ROLE_ADMINISTRATOR,
            Role::ProductManager => ROLE_PRODUCT_MANAGER,
            Role::DefaultUser => ROLE_DEFAULT_USER,
        }
    }

    /// Parse a role code; unknown codes yield `None`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            ROLE_ADMINISTRATOR => Some(Role::Administrator),
            ROLE_PRODUCT_MANAGER => Some(Role::ProductManager),
            ROLE_DEFAULT_USER => Some(Role::DefaultUser),
            _ => None,
        }
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The identity the authorization core reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub is_active: bool,
    pub role: Option<Role>,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.is_active && self.role.is_some_and(|role| role.is_admin())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub google_id: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub full_name: String,
    pub picture: String,
    pub locale: Option<String>,
    pub domain: Option<String>,
    pub is_active: bool,
    pub role: Option<Role>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Project the user onto the identity used by permission checks
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            is_active: self.is_active,
            role: self.role,
        }
    }

    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.principal().is_admin()
    }
}

/// Profile claims taken from a verified Google ID token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentityProfile {
    pub google_id: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub full_name: String,
    pub picture: String,
    pub locale: Option<String>,
    pub domain: Option<String>,
}

/// User update data transfer object.
///
/// `is_active` and `role` are privileged: see [`UserUpdate::without_privileged_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub full_name: Option<String>,
    pub picture: Option<String>,
    pub locale: Option<String>,
    pub domain: Option<String>,
    pub is_active: Option<bool>,
    /// Role code; must name a seeded role
    pub role: Option<String>,
}

impl UserUpdate {
    /// Drop the fields only an administrator may change on someone else
    pub fn without_privileged_fields(self) -> Self {
        Self {
            is_active: None,
            role: None,
            ..self
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub full_name: String,
    pub picture: String,
    pub locale: Option<String>,
    pub domain: Option<String>,
    pub is_active: bool,
    pub role: Option<Role>,
    pub last_login: Option<DateTime<Utc>>,
    pub family_assignments: Vec<FamilyAssignment>,
}

impl UserResponse {
    pub fn new(user: User, family_assignments: Vec<FamilyAssignment>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            firstname: user.firstname,
            lastname: user.lastname,
            full_name: user.full_name,
            picture: user.picture,
            locale: user.locale,
            domain: user.domain,
            is_active: user.is_active,
            role: user.role,
            last_login: user.last_login,
            family_assignments,
        }
    }
}

/// Compact user view returned alongside issued tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub role: Option<Role>,
    pub picture: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_active: user.is_active,
            role: user.role,
            picture: user.picture.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_codes_round_trip_and_unknown_is_none() {
        for role in [Role::Administrator, Role::ProductManager, Role::DefaultUser] {
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
        assert_eq!(Role::from_code("superuser"), None);
    }

    #[test]
    fn inactive_administrator_is_not_admin() {
        let principal = Principal {
            id: Uuid::new_v4(),
            is_active: false,
            role: Some(Role::Administrator),
        };
        assert!(!principal.is_admin());
    }

    #[test]
    fn privileged_fields_are_dropped() {
        let update = UserUpdate {
            firstname: Some("Ana".into()),
            is_active: Some(false),
            role: Some("administrator".into()),
            ..Default::default()
        };

        let stripped = update.without_privileged_fields();
        assert_eq!(stripped.firstname.as_deref(), Some("Ana"));
        assert_eq!(stripped.is_active, None);
        assert_eq!(stripped.role, None);
    }
}
