//! HTTP handlers.

pub mod auth_handler;
pub mod health_handler;
pub mod product_handler;
pub mod user_handler;
pub mod video_handler;

pub use auth_handler::{auth_routes, token_routes};
pub use health_handler::{health_routes, DatabaseCheck, HealthCheck, SessionStoreCheck};
pub use product_handler::product_routes;
pub use user_handler::user_routes;
pub use video_handler::video_routes;
