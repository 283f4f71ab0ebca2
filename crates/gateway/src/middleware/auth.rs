//! Authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use common::AppError;
use domain::{Principal, User};

use crate::state::AppState;

/// Current authenticated user, resolved from a live session.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    principal: Principal,
}

impl CurrentUser {
    pub fn principal(&self) -> Principal {
        self.principal
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            principal: user.principal(),
        }
    }
}

/// Reject requests without a valid bearer token bound to a live session of an
/// active user.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let user = state.auth.authenticate(bearer.token()).await?;
    request.extensions_mut().insert(CurrentUser::from(&user));

    Ok(next.run(request).await)
}
