//! Google ID token verification through the tokeninfo endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use common::{AppError, AppResult};
use domain::IdentityProfile;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Turns an ID token from the frontend into a verified identity.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    /// `Unauthorized` when the token is invalid, expired or issued for another client
    async fn verify(&self, id_token: &str) -> AppResult<IdentityProfile>;
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    iss: String,
    sub: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    given_name: String,
    #[serde(default)]
    family_name: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    picture: String,
    locale: Option<String>,
    hd: Option<String>,
}

impl From<TokenInfo> for IdentityProfile {
    fn from(info: TokenInfo) -> Self {
        IdentityProfile {
            google_id: info.sub,
            email: info.email,
            firstname: info.given_name,
            lastname: info.family_name,
            full_name: info.name,
            picture: info.picture,
            locale: info.locale,
            domain: info.hd,
        }
    }
}

pub struct GoogleTokenVerifier {
    http: reqwest::Client,
    client_id: String,
    tokeninfo_url: String,
}

impl GoogleTokenVerifier {
    pub fn new(client_id: impl Into<String>, tokeninfo_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: client_id.into(),
            tokeninfo_url: tokeninfo_url.into(),
        }
    }
}

#[async_trait]
impl IdTokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, id_token: &str) -> AppResult<IdentityProfile> {
        if self.client_id.is_empty() {
            return Err(AppError::service_unavailable("Google sign-in"));
        }

        let response = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Google tokeninfo request failed: {}", e)))?;

        if response.status().is_client_error() {
            debug!(status = %response.status(), "Google rejected the ID token");
            return Err(AppError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(AppError::upstream(format!(
                "Google tokeninfo returned status: {}",
                response.status()
            )));
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Unreadable tokeninfo response: {}", e)))?;

        if info.aud != self.client_id || !GOOGLE_ISSUERS.contains(&info.iss.as_str()) {
            debug!(aud = %info.aud, iss = %info.iss, "ID token was not issued for this client");
            return Err(AppError::Unauthorized);
        }

        Ok(info.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokeninfo_maps_to_profile() {
        let info: TokenInfo = serde_json::from_value(serde_json::json!({
            "aud": "client-1",
            "iss": "https://accounts.google.com",
            "sub": "1077",
            "email": "ana@example.com",
            "given_name": "Ana",
            "family_name": "Lopez",
            "name": "Ana Lopez",
            "hd": "example.com"
        }))
        .unwrap();

        let profile = IdentityProfile::from(info);

        assert_eq!(profile.google_id, "1077");
        assert_eq!(profile.full_name, "Ana Lopez");
        assert_eq!(profile.picture, "");
        assert_eq!(profile.domain.as_deref(), Some("example.com"));
        assert_eq!(profile.locale, None);
    }

    #[tokio::test]
    async fn unconfigured_client_is_unavailable() {
        let verifier = GoogleTokenVerifier::new("", "http://127.0.0.1:9/tokeninfo");
        let result = verifier.verify("token").await;
        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }
}
