//! Relevance guardrail
//!
//! A single deterministic chat call whose output is biased towards the
//! tokens `0` and `1`. Only `1` counts as relevant.
//!
//! Author: hephaex@gmail.com

use crate::openai::OpenAiClient;
use crate::types::{ChatCompletionRequest, ChatMessage};
use async_trait::async_trait;
use ecc_core::{AppConfig, EccError, Query, RelevanceClassifier, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Domain the guardrail accepts questions about
pub const GUARDRAIL_OBJECTIVE: &str = "Santa Clara University (SCU), Provost, Education advising, courses, academic policies, student advising and support or a related question";

/// Tokenizer ids of `0` and `1`
const LABEL_TOKENS: [&str; 2] = ["15", "16"];
const LABEL_BIAS: i32 = 100;

/// Relevance classifier backed by a chat completion call
pub struct GuardrailClassifier {
    client: Arc<OpenAiClient>,
    model: String,
}

impl GuardrailClassifier {
    pub fn new(client: Arc<OpenAiClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Create from config
    pub fn from_config(client: Arc<OpenAiClient>, config: &AppConfig) -> Self {
        Self::new(client, config.openai.guardrail_model.clone())
    }

    pub fn build_request(&self, query: &Query) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt()),
                ChatMessage::user(query.as_str()),
            ],
            seed: Some(0),
            temperature: 0.0,
            max_tokens: Some(1),
            logit_bias: LABEL_TOKENS
                .iter()
                .map(|token| (token.to_string(), LABEL_BIAS))
                .collect::<HashMap<_, _>>(),
        }
    }
}

fn system_prompt() -> String {
    format!(
        "You will receive a user query and your task is to classify if a given user request is related to {GUARDRAIL_OBJECTIVE}. If it is relevant, return `1`. Else, return `0`"
    )
}

/// Map the model's single-token answer to a relevance decision
pub(crate) fn interpret_label(content: &str) -> Result<bool> {
    content
        .trim()
        .parse::<i64>()
        .map(|label| label == 1)
        .map_err(|_| EccError::LlmError(format!("Unexpected guardrail output: {content:?}")))
}

#[async_trait]
impl RelevanceClassifier for GuardrailClassifier {
    async fn classify(&self, query: &Query) -> Result<bool> {
        let response = self.client.chat_completion(&self.build_request(query)).await?;
        let content = response
            .first_content()
            .ok_or_else(|| EccError::LlmError("Guardrail returned no choices".to_string()))?;

        let relevant = interpret_label(content)?;
        tracing::debug!(relevant, "Guardrail classification");
        Ok(relevant)
    }
}
