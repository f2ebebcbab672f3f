//! Shared client utilities for API access, configuration and errors.
//!
//! Centralizing these helpers keeps network behavior consistent and avoids
//! duplicated request setup in the recovery steps. These utilities never see
//! passwords in clear text outside the request body, and callers must still
//! avoid logging request payloads.

pub mod api;
pub mod config;
pub mod errors;

pub use api::ApiClient;
pub use config::AppConfig;
pub use errors::AppError;
