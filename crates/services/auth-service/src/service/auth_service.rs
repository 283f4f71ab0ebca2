//! Authentication service - Google sign-in, token issuance and verification.
//!
//! Access and refresh tokens are HS256 JWTs bound to a session id. A token is
//! only honored while its session is live, so revoking a user's sessions
//! invalidates every token issued to them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::{IdTokenVerifier, UserDirectory};
use crate::config::AuthServiceConfig;
use crate::session::SessionStore;
use common::{AppError, AppResult};
use domain::{User, UserSummary, TOKEN_TYPE_BEARER};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    /// Role code at issue time
    pub role: Option<String>,
    /// Session the token belongs to
    pub sid: String,
    pub typ: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

/// Token pair returned after a successful sign-in
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
    pub user: UserSummary,
}

/// New access token issued from a refresh token
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RefreshResponse {
    pub access: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserSummary,
}

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange a Google ID token for a local token pair
    async fn google_login(&self, id_token: &str) -> AppResult<LoginResponse>;

    /// Issue a new access token carrying the user's current role
    async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshResponse>;

    /// Resolve a bearer access token to an active user
    async fn authenticate(&self, access_token: &str) -> AppResult<User>;

    /// Verify signature, expiry and kind of a token
    fn verify_token(&self, token: &str, kind: TokenKind) -> AppResult<Claims>;
}

pub struct Authenticator {
    verifier: Arc<dyn IdTokenVerifier>,
    directory: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionStore>,
    jwt_secret: String,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl Authenticator {
    pub fn new(
        verifier: Arc<dyn IdTokenVerifier>,
        directory: Arc<dyn UserDirectory>,
        sessions: Arc<dyn SessionStore>,
        config: &AuthServiceConfig,
    ) -> Self {
        Self {
            verifier,
            directory,
            sessions,
            jwt_secret: config.jwt_secret.clone(),
            access_lifetime: config.access_token_lifetime,
            refresh_lifetime: config.refresh_token_lifetime,
        }
    }

    fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    fn issue(&self, user: &User, session_id: &str, kind: TokenKind) -> AppResult<String> {
        let lifetime = match kind {
            TokenKind::Access => self.access_lifetime,
            TokenKind::Refresh => self.refresh_lifetime,
        };
        let now = Utc::now().timestamp();
        let lifetime = i64::try_from(lifetime.as_secs())
            .map_err(|_| AppError::internal("Token lifetime out of range"))?;

        let claims = Claims {
            sub: user.id,
            role: user.role.map(|role| role.code().to_string()),
            sid: session_id.to_string(),
            typ: kind,
            iat: now,
            exp: now + lifetime,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret_bytes()),
        )?)
    }

    /// Decode a token and require its session to be live.
    async fn live_claims(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let claims = self.verify_token(token, kind)?;
        if !self.sessions.is_live(&claims.sid).await? {
            return Err(AppError::Unauthorized);
        }
        Ok(claims)
    }

    async fn active_user(&self, id: Uuid) -> AppResult<User> {
        let user = self
            .directory
            .find_user(id)
            .await?
            .ok_or(AppError::Unauthorized)?;
        if !user.is_active {
            return Err(AppError::InactiveUser);
        }
        Ok(user)
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn google_login(&self, id_token: &str) -> AppResult<LoginResponse> {
        let id_token = id_token.trim();
        if id_token.is_empty() {
            return Err(AppError::BadRequest("Token not provided".to_string()));
        }

        let profile = self.verifier.verify(id_token).await?;
        let user = self.directory.sign_in(profile).await?;
        if !user.is_active {
            return Err(AppError::forbidden("User is inactive"));
        }

        let session_id = self.sessions.open(user.id, self.refresh_lifetime).await?;
        let access = self.issue(&user, &session_id, TokenKind::Access)?;
        let refresh = self.issue(&user, &session_id, TokenKind::Refresh)?;
        tracing::info!(user_id = %user.id, "User signed in with Google");

        Ok(LoginResponse {
            access,
            refresh,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.access_lifetime.as_secs(),
            user: UserSummary::from(&user),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshResponse> {
        let claims = self.live_claims(refresh_token, TokenKind::Refresh).await?;
        // Fresh user data so the new token carries the current role
        let user = self.active_user(claims.sub).await?;
        let access = self.issue(&user, &claims.sid, TokenKind::Access)?;

        Ok(RefreshResponse {
            access,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.access_lifetime.as_secs(),
            user: UserSummary::from(&user),
        })
    }

    async fn authenticate(&self, access_token: &str) -> AppResult<User> {
        let claims = self.live_claims(access_token, TokenKind::Access).await?;
        self.active_user(claims.sub).await
    }

    fn verify_token(&self, token: &str, kind: TokenKind) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret_bytes()),
            &Validation::default(),
        )?;
        if token_data.claims.typ != kind {
            return Err(AppError::Unauthorized);
        }
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockIdTokenVerifier, MockUserDirectory};
    use crate::session::MockSessionStore;
    use domain::{IdentityProfile, Role};
    use mockall::predicate::eq;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn config() -> AuthServiceConfig {
        AuthServiceConfig {
            jwt_secret: SECRET.to_string(),
            ..Default::default()
        }
    }

    fn user(is_active: bool) -> User {
        User {
            id: Uuid::new_v4(),
            google_id: "1077".to_string(),
            email: "ana@example.com".to_string(),
            firstname: "Ana".to_string(),
            lastname: "Lopez".to_string(),
            full_name: "Ana Lopez".to_string(),
            picture: String::new(),
            locale: None,
            domain: None,
            is_active,
            role: Some(Role::DefaultUser),
            last_login: None,
            created_at: Utc::now(),
        }
    }

    fn verifier() -> MockIdTokenVerifier {
        let mut verifier = MockIdTokenVerifier::new();
        verifier.expect_verify().returning(|_| {
            Ok(IdentityProfile {
                google_id: "1077".to_string(),
                email: "ana@example.com".to_string(),
                ..Default::default()
            })
        });
        verifier
    }

    fn live_sessions() -> MockSessionStore {
        let mut sessions = MockSessionStore::new();
        sessions
            .expect_open()
            .returning(|_, _| Ok("session-1".to_string()));
        sessions.expect_is_live().returning(|_| Ok(true));
        sessions
    }

    #[tokio::test]
    async fn test_google_login_issues_bound_tokens() {
        let signed_in = user(true);
        let id = signed_in.id;
        let mut directory = MockUserDirectory::new();
        directory
            .expect_sign_in()
            .returning(move |_| Ok(signed_in.clone()));

        let auth = Authenticator::new(
            Arc::new(verifier()),
            Arc::new(directory),
            Arc::new(live_sessions()),
            &config(),
        );
        let response = auth.google_login("google-token").await.unwrap();

        let claims = auth.verify_token(&response.refresh, TokenKind::Refresh).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.sid, "session-1");
        assert_eq!(claims.role.as_deref(), Some("default_user"));
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 12 * 3_600);
        assert!(auth.verify_token(&response.access, TokenKind::Refresh).is_err());
    }

    #[tokio::test]
    async fn test_google_login_without_token_is_bad_request() {
        let auth = Authenticator::new(
            Arc::new(MockIdTokenVerifier::new()),
            Arc::new(MockUserDirectory::new()),
            Arc::new(MockSessionStore::new()),
            &config(),
        );

        let result = auth.google_login("  ").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_sign_in() {
        let mut directory = MockUserDirectory::new();
        directory.expect_sign_in().returning(|_| Ok(user(false)));
        let mut sessions = MockSessionStore::new();
        sessions.expect_open().never();

        let auth = Authenticator::new(
            Arc::new(verifier()),
            Arc::new(directory),
            Arc::new(sessions),
            &config(),
        );
        let result = auth.google_login("google-token").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_refresh_uses_current_role() {
        let mut current = user(true);
        let id = current.id;
        let mut directory = MockUserDirectory::new();
        directory.expect_sign_in().returning({
            let user = current.clone();
            move |_| Ok(user.clone())
        });
        current.role = Some(Role::ProductManager);
        directory
            .expect_find_user()
            .with(eq(id))
            .returning(move |_| Ok(Some(current.clone())));

        let auth = Authenticator::new(
            Arc::new(verifier()),
            Arc::new(directory),
            Arc::new(live_sessions()),
            &config(),
        );
        let login = auth.google_login("google-token").await.unwrap();
        let refreshed = auth.refresh(&login.refresh).await.unwrap();

        let claims = auth.verify_token(&refreshed.access, TokenKind::Access).unwrap();
        assert_eq!(claims.role.as_deref(), Some("product_manager"));
        assert_eq!(claims.sid, "session-1");
    }

    #[tokio::test]
    async fn test_revoked_session_is_rejected() {
        let signed_in = user(true);
        let mut directory = MockUserDirectory::new();
        directory
            .expect_sign_in()
            .returning(move |_| Ok(signed_in.clone()));
        directory.expect_find_user().never();
        let mut sessions = MockSessionStore::new();
        sessions
            .expect_open()
            .returning(|_, _| Ok("session-1".to_string()));
        sessions.expect_is_live().returning(|_| Ok(false));

        let auth = Authenticator::new(
            Arc::new(verifier()),
            Arc::new(directory),
            Arc::new(sessions),
            &config(),
        );
        let login = auth.google_login("google-token").await.unwrap();

        assert!(matches!(
            auth.authenticate(&login.access).await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            auth.refresh(&login.refresh).await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_inactive_user_token_is_rejected() {
        let signed_in = user(true);
        let mut deactivated = signed_in.clone();
        deactivated.is_active = false;
        let mut directory = MockUserDirectory::new();
        directory
            .expect_sign_in()
            .returning(move |_| Ok(signed_in.clone()));
        directory
            .expect_find_user()
            .returning(move |_| Ok(Some(deactivated.clone())));

        let auth = Authenticator::new(
            Arc::new(verifier()),
            Arc::new(directory),
            Arc::new(live_sessions()),
            &config(),
        );
        let login = auth.google_login("google-token").await.unwrap();

        assert!(matches!(
            auth.authenticate(&login.access).await,
            Err(AppError::InactiveUser)
        ));
    }
}
