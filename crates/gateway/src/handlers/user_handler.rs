//! User handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::AppResult;
use domain::{AssignmentInput, FamilyAssignment, UserResponse, UserUpdate};

use crate::extractors::{JsonBody, ValidatedJson};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// User update request with validation.
///
/// `is_active` and `role` are ignored unless an administrator edits someone
/// else.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane.doe@example.com")]
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[schema(example = "Jane Doe")]
    pub full_name: Option<String>,
    pub picture: Option<String>,
    pub locale: Option<String>,
    pub domain: Option<String>,
    pub is_active: Option<bool>,
    /// Role code
    #[schema(example = "product_manager")]
    pub role: Option<String>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            email: request.email,
            firstname: request.firstname,
            lastname: request.lastname,
            full_name: request.full_name,
            picture: request.picture,
            locale: request.locale,
            domain: request.domain,
            is_active: request.is_active,
            role: request.role,
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user).put(update_user))
        .route("/:id/families/assign", put(assign_families))
}

/// List users (administrators see everyone, others only themselves)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Visible users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.users.list_users(current_user.principal()).await?;
    Ok(Json(users))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found or not visible")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.users.get_user(current_user.principal(), id).await?;
    Ok(Json(user))
}

/// Update user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found or not visible"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .users
        .update_user(current_user.principal(), id, payload.into())
        .await?;
    Ok(Json(user))
}

/// Replace the user's family assignments (administrators only)
#[utoipa::path(
    put,
    path = "/users/{id}/families/assign",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = Vec<AssignmentInput>,
    responses(
        (status = 200, description = "New assignment set", body = Vec<FamilyAssignment>),
        (status = 400, description = "An item is missing an id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn assign_families(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(items): JsonBody<Vec<AssignmentInput>>,
) -> AppResult<Json<Vec<FamilyAssignment>>> {
    let assignments = state
        .assignments
        .replace_family_assignments(current_user.principal(), id, items)
        .await?;
    Ok(Json(assignments))
}
