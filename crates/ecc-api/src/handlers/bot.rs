//! Bot handler
//!
//! Author: hephaex@gmail.com

use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::adapter::{self, BotRequest};
use crate::state::AppState;

/// Answer one question about ECC services.
///
/// Bound for every method; the adapter answers OPTIONS and rejects anything
/// other than POST.
#[utoipa::path(
    post,
    path = "/bot",
    tag = "bot",
    request_body = crate::adapter::BotQuery,
    responses(
        (status = 200, description = "Answer or guardrail refusal", body = crate::adapter::BotAnswer),
        (status = 400, description = "Body is not JSON or lacks a usable query", body = crate::error::ErrorBody),
        (status = 405, description = "Method other than POST or OPTIONS", body = crate::error::ErrorBody),
        (status = 500, description = "Missing configuration, upstream failure or empty generation")
    )
)]
pub async fn bot_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> impl IntoResponse {
    tracing::debug!(method = %method, bytes = body.len(), "Bot request");
    adapter::handle(&state, BotRequest::new(method, body)).await
}
