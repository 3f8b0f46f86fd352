//! ECC API - HTTP surface of the Provost bot
//!
//! The bot answers through one platform-neutral [`adapter::handle`]; the
//! axum router and the serverless [`gateway`] are thin translations around
//! it.
//!
//! Author: hephaex@gmail.com

pub mod adapter;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod state;
pub mod telemetry;

use axum::{
    middleware::from_fn,
    routing::{any, get},
    Router,
};
use ecc_core::{AppConfig, ConfigError};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_VAR: &str = "ECC_CONFIG";

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::health_check).fallback(handlers::fallback::get_only),
        )
        .route("/bot", any(handlers::bot_handler))
        .route(
            "/api-docs/openapi.json",
            get(openapi::openapi_json).fallback(handlers::fallback::get_only),
        )
        .fallback(handlers::fallback::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(middleware::cors_headers_middleware))
}

/// Load configuration for a binary.
///
/// An explicit path, or else `ECC_CONFIG`, selects a TOML file whose values
/// the environment then overrides. Without either, only the environment
/// is read.
pub fn load_config(path: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    let path = path.or_else(|| std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from));

    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading config file");
            AppConfig::from_file(path)?.with_env_override()
        }
        None => AppConfig::from_env(),
    }
}
