//! Common utilities shared across all services.
//!
//! This crate provides:
//! - Unified error handling for HTTP responses
//! - Configuration structures and lifetime parsing

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
