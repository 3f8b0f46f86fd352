//! OpenAPI document
//!
//! Author: hephaex@gmail.com

use axum::Json;
use utoipa::OpenApi;

use crate::adapter::{BotAnswer, BotQuery};
use crate::error::ErrorBody;
use crate::handlers::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ECC Provost Bot API",
        description = "Answers questions about Engineering Computing Center services from an indexed knowledge base."
    ),
    paths(
        crate::handlers::bot::bot_handler,
        crate::handlers::health::health_check,
    ),
    components(schemas(BotQuery, BotAnswer, ErrorBody, HealthResponse)),
    tags(
        (name = "bot", description = "Question answering"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Serve the generated document as JSON
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
