//! JSON replies for unknown routes and unsupported methods
//!
//! Author: hephaex@gmail.com

use axum::{http::StatusCode, Json};

use crate::error::ErrorBody;

/// Router fallback: 404 `{"error": "Not found"}`
pub async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "Not found".to_string(),
            allowed: None,
        }),
    )
}

/// Method fallback for the GET-only routes
pub async fn get_only() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            error: "Method not allowed".to_string(),
            allowed: Some(vec!["GET".to_string()]),
        }),
    )
}
