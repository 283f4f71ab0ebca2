//! Auth Service Library
//!
//! Google ID token sign-in, locally issued session tokens and the redis
//! session store that makes those tokens revocable. Users are resolved
//! through the catalog service in-process.

pub mod client;
pub mod config;
pub mod service;
pub mod session;

use std::sync::Arc;

use catalog_service_lib::service::UserService;

use crate::client::{CatalogUserDirectory, GoogleTokenVerifier};
use crate::config::AuthServiceConfig;
use crate::service::Authenticator;
use crate::session::SessionStore;

/// Build the authenticator with the production collaborators.
pub fn build_authenticator(
    config: &AuthServiceConfig,
    users: Arc<dyn UserService>,
    sessions: Arc<dyn SessionStore>,
) -> Authenticator {
    let verifier = GoogleTokenVerifier::new(
        config.google_client_id.clone(),
        config.google_tokeninfo_url.clone(),
    );
    Authenticator::new(
        Arc::new(verifier),
        Arc::new(CatalogUserDirectory::new(users)),
        sessions,
        config,
    )
}
