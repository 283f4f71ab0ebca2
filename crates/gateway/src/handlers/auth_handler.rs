//! Sign-in and token refresh handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use auth_service_lib::service::{LoginResponse, RefreshResponse};
use common::AppResult;

use crate::extractors::{JsonBody, ValidatedJson};
use crate::state::AppState;

/// Google sign-in request
#[derive(Debug, Deserialize, ToSchema)]
pub struct GoogleLoginRequest {
    /// Google ID token obtained by the client
    #[serde(default)]
    pub token: String,
}

/// Token refresh request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Refresh token not provided"))]
    pub refresh: String,
}

/// Routes mounted under `/auth`.
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/google", post(google_login))
}

/// Routes mounted under `/token`.
pub fn token_routes() -> Router<AppState> {
    Router::new().route("/refresh", post(refresh_token))
}

/// Exchange a Google ID token for an access/refresh pair
#[utoipa::path(
    post,
    path = "/auth/google",
    tag = "Authentication",
    request_body = GoogleLoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Token not provided"),
        (status = 401, description = "Invalid Google token"),
        (status = 403, description = "User is inactive")
    )
)]
pub async fn google_login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<GoogleLoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state.auth.google_login(payload.token.trim()).await?;
    Ok(Json(response))
}

/// Issue a new access token from a refresh token
#[utoipa::path(
    post,
    path = "/token/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 400, description = "Refresh token not provided"),
        (status = 401, description = "Invalid, revoked or expired token, or inactive user")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    let response = state.auth.refresh(&payload.refresh).await?;
    Ok(Json(response))
}
