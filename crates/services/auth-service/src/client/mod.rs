//! Collaborators the authenticator talks to.

mod google;
mod user_directory;

pub use google::{GoogleTokenVerifier, IdTokenVerifier};
pub use user_directory::{CatalogUserDirectory, UserDirectory};

#[cfg(any(test, feature = "test-utils"))]
pub use google::MockIdTokenVerifier;
#[cfg(any(test, feature = "test-utils"))]
pub use user_directory::MockUserDirectory;
