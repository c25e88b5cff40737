//! # API Shared
//!
//! Shared utilities and definitions for the ward APIs.
//!
//! Contains:
//! - Wire types for requests and responses (`wire` module)
//! - Shared services like `HealthService`
//! - Authentication utilities
//!
//! Used by `api-rest`, which the workspace `ward-run` binary serves.

pub mod auth;
pub mod health;
pub mod wire;

pub use auth::{validate_api_key, AuthError, API_KEY_HEADER};
pub use health::HealthService;
pub use wire::*;
