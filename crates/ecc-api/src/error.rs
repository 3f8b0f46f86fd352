//! API error handling
//!
//! Author: hephaex@gmail.com

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ecc_core::EccError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::adapter::BotResponse;

/// Message for bodies that are not JSON or lack a usable `query`
pub const INVALID_BODY: &str = "Request body must be JSON and contain a 'query' key.";

/// Message for generations that produced no message item
pub const GENERATION_FAILED: &str = "Error in generating response.";

/// Methods accepted by the bot route
pub const ALLOWED_METHODS: [&str; 2] = ["POST", "OPTIONS"];

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message
    #[schema(example = "Request body must be JSON and contain a 'query' key.")]
    pub error: String,
    /// Allowed methods, only on 405 responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

/// Application error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    BadRequest,
    MethodNotAllowed,
    Config(String),
    Upstream(String),
    EmptyGeneration,
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Config(_)
            | AppError::Upstream(_)
            | AppError::EmptyGeneration
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            AppError::BadRequest => json!({ "error": INVALID_BODY }),
            AppError::MethodNotAllowed => json!({
                "error": "Method not allowed",
                "allowed": ALLOWED_METHODS,
            }),
            AppError::Config(msg) | AppError::Upstream(msg) | AppError::Internal(msg) => {
                json!({ "error": msg })
            }
            // Reported under the success key, not "error"
            AppError::EmptyGeneration => json!({ "response": GENERATION_FAILED }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        BotResponse::from(self).into_response()
    }
}

impl From<EccError> for AppError {
    fn from(err: EccError) -> Self {
        match err {
            EccError::ValidationError(_) => AppError::BadRequest,
            EccError::ConfigError(msg) => AppError::Config(msg),
            EccError::LlmError(msg) => AppError::Upstream(msg),
            EccError::EmptyGeneration => AppError::EmptyGeneration,
            EccError::IoError(e) => AppError::Internal(e.to_string()),
            EccError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
