//! Serverless gateway entry point
//!
//! Translates a function-gateway event (method plus optional string body)
//! into a [`BotRequest`] and the [`BotResponse`] back into the
//! `statusCode`/`headers`/`body` shape gateways expect.
//!
//! Author: hephaex@gmail.com

use axum::http::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::adapter::{self, BotRequest, BotResponse};
use crate::state::AppState;

/// Inbound gateway event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRequest {
    /// Absent methods are treated as GET
    #[serde(alias = "httpMethod", default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub body: Option<String>,
}

fn default_method() -> String {
    Method::GET.to_string()
}

/// Outbound gateway response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON text; empty for 204
    pub body: String,
}

impl From<BotResponse> for GatewayResponse {
    fn from(response: BotResponse) -> Self {
        Self {
            status_code: response.status.as_u16(),
            headers: response
                .headers()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            body: response.body_string(),
        }
    }
}

/// Handle one gateway event
pub async fn invoke(state: &AppState, event: GatewayRequest) -> GatewayResponse {
    // Unparseable methods fall through to the 405 branch
    let method = Method::from_bytes(event.method.to_ascii_uppercase().as_bytes())
        .unwrap_or(Method::CONNECT);
    tracing::debug!(method = %method, "Gateway event received");

    let request = BotRequest::new(method, event.body.unwrap_or_default());
    adapter::handle(state, request).await.into()
}
