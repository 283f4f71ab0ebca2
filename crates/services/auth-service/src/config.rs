//! Auth service configuration.

use std::env;
use std::time::Duration;

use common::{parse_lifetime, AppError, AppResult, CacheConfig};
use domain::{DEFAULT_ACCESS_TOKEN_LIFETIME, DEFAULT_REFRESH_TOKEN_LIFETIME, MIN_JWT_SECRET_LENGTH};

/// Google endpoint that validates an ID token and returns its claims.
pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// JWT secret for signing tokens (min 32 characters)
    pub jwt_secret: String,
    pub access_token_lifetime: Duration,
    pub refresh_token_lifetime: Duration,
    /// OAuth client ID the Google ID token must be issued for
    pub google_client_id: String,
    pub google_tokeninfo_url: String,
    /// Redis holding live sessions
    pub cache: CacheConfig,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            jwt_secret: env::var("JWT_SECRET")
                .or_else(|_| env::var("AUTH_SERVICE_JWT_SECRET"))
                .unwrap_or_default(),
            access_token_lifetime: lifetime_from_env(
                "JWT_ACCESS_TOKEN_LIFETIME",
                DEFAULT_ACCESS_TOKEN_LIFETIME,
            )?,
            refresh_token_lifetime: lifetime_from_env(
                "JWT_REFRESH_TOKEN_LIFETIME",
                DEFAULT_REFRESH_TOKEN_LIFETIME,
            )?,
            google_client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            google_tokeninfo_url: env::var("GOOGLE_TOKENINFO_URL")
                .unwrap_or_else(|_| GOOGLE_TOKENINFO_URL.to_string()),
            cache: CacheConfig::from_env("AUTH_SERVICE"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "JWT_SECRET must be set (minimum {} characters)",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        if self.access_token_lifetime.is_zero() || self.refresh_token_lifetime.is_zero() {
            return Err(AppError::internal("Token lifetimes must be positive"));
        }
        Ok(())
    }

    /// Get JWT secret as bytes.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

fn lifetime_from_env(key: &str, default: &str) -> AppResult<Duration> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    parse_lifetime(&raw).ok_or_else(|| {
        AppError::internal(format!(
            "{} must look like <number><d|h|m|s>, got '{}'",
            key, raw
        ))
    })
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_lifetime: Duration::from_secs(12 * 3_600),
            refresh_token_lifetime: Duration::from_secs(7 * 86_400),
            google_client_id: String::new(),
            google_tokeninfo_url: GOOGLE_TOKENINFO_URL.to_string(),
            cache: CacheConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_secret_is_rejected() {
        let config = AuthServiceConfig {
            jwt_secret: "too-short".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn long_secret_is_accepted() {
        let config = AuthServiceConfig {
            jwt_secret: "a".repeat(MIN_JWT_SECRET_LENGTH),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
