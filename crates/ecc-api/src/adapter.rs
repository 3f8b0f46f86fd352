//! Request adapter
//!
//! Platform-neutral handling of one `/bot` request. The axum route and the
//! serverless gateway both translate into [`BotRequest`], call [`handle`],
//! and translate the [`BotResponse`] back out.
//!
//! Author: hephaex@gmail.com

use axum::{
    body::Bytes,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use ecc_core::{Query, MISSING_VECTOR_STORE};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::error::{AppError, ALLOWED_METHODS};
use crate::middleware::cors::CORS_HEADERS;
use crate::state::AppState;

/// Answer returned when the guardrail rejects a query
pub const REFUSAL: &str = "Sorry, i cannot help you with that!";

/// Bot request body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BotQuery {
    /// User's question
    #[schema(example = "What are the ECC lab hours?")]
    pub query: String,
}

/// Bot response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BotAnswer {
    /// Generated answer, passed through unchanged
    #[schema(example = "The ECC Lab is open Monday–Friday, 8:00 AM–8:00 PM during academic terms.")]
    pub response: String,
}

/// Inbound request, independent of the serving platform
#[derive(Debug, Clone)]
pub struct BotRequest {
    pub method: Method,
    pub body: Bytes,
}

impl BotRequest {
    pub fn new(method: Method, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            body: body.into(),
        }
    }

    pub fn post(body: impl Into<Bytes>) -> Self {
        Self::new(Method::POST, body)
    }
}

/// Outbound response, independent of the serving platform
#[derive(Debug, Clone, PartialEq)]
pub struct BotResponse {
    pub status: StatusCode,
    /// `None` only for the 204 pre-flight reply
    pub body: Option<Value>,
}

impl BotResponse {
    /// 200 with `{"response": text}`
    pub fn answer(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self {
            status: StatusCode::OK,
            body: Some(json!({ "response": text })),
        }
    }

    /// 204 with no body
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }

    /// Headers every platform must attach to this response
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers: Vec<(&'static str, String)> = CORS_HEADERS
            .iter()
            .map(|(name, value)| (*name, value.to_string()))
            .collect();
        if self.body.is_some() {
            headers.push(("Content-Type", "application/json".to_string()));
        }
        if self.status == StatusCode::METHOD_NOT_ALLOWED {
            headers.push(("Allow", ALLOWED_METHODS.join(", ")));
        }
        headers
    }

    /// Serialized body; empty for 204
    pub fn body_string(&self) -> String {
        self.body
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default()
    }
}

impl From<AppError> for BotResponse {
    fn from(err: AppError) -> Self {
        Self {
            status: err.status(),
            body: Some(err.body()),
        }
    }
}

impl IntoResponse for BotResponse {
    fn into_response(self) -> Response {
        let headers = self.headers();
        let mut response = match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        };

        for (name, value) in headers {
            if let Ok(value) = HeaderValue::from_str(&value) {
                response.headers_mut().insert(name, value);
            }
        }
        if response.status() == StatusCode::NO_CONTENT {
            response.headers_mut().remove(header::CONTENT_TYPE);
        }
        response
    }
}

/// Handle one `/bot` request
pub async fn handle(state: &AppState, request: BotRequest) -> BotResponse {
    match request.method {
        Method::OPTIONS => return BotResponse::no_content(),
        Method::POST => {}
        ref other => {
            tracing::debug!(method = %other, "Method not allowed on /bot");
            return AppError::MethodNotAllowed.into();
        }
    }

    match answer(state, &request.body).await {
        Ok(response) => response,
        Err(err) => err.into(),
    }
}

async fn answer(state: &AppState, body: &[u8]) -> Result<BotResponse, AppError> {
    let query = parse_query(body)?;

    if state.guardrails_enabled() {
        let relevant = state.classifier.classify(&query).await.map_err(|e| {
            tracing::error!(error = %e, "Guardrail classification failed");
            AppError::from(e)
        })?;
        if !relevant {
            tracing::info!("Query rejected by guardrail");
            return Ok(BotResponse::answer(REFUSAL));
        }
    }

    if !state.vector_store_configured() {
        tracing::error!("No vector store configured");
        return Err(AppError::Config(MISSING_VECTOR_STORE.to_string()));
    }

    let text = state.generator.generate(&query).await?;
    Ok(BotResponse::answer(text))
}

/// Extract a non-blank `query` string from a JSON object body
pub fn parse_query(body: &[u8]) -> Result<Query, AppError> {
    let payload: Value = serde_json::from_slice(body).map_err(|_| AppError::BadRequest)?;
    let text = payload
        .get("query")
        .and_then(Value::as_str)
        .ok_or(AppError::BadRequest)?;

    Query::new(text).map_err(AppError::from)
}
