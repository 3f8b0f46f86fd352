//! File-search answer generator
//!
//! Sends the query to the Responses API with the `file_search` tool bound
//! to the configured vector store and returns the first message's text.
//!
//! Author: hephaex@gmail.com

use crate::instructions::instructions_for;
use crate::openai::OpenAiClient;
use crate::types::{ResponseRequest, Tool};
use async_trait::async_trait;
use ecc_core::{AnswerGenerator, AppConfig, EccError, Query, Result, MISSING_VECTOR_STORE};
use std::sync::Arc;

/// Extra output requested so search hits show up in the response
pub const FILE_SEARCH_INCLUDE: &str = "file_search_call.results";

/// Answer generator grounded in a managed vector store
pub struct FileSearchGenerator {
    client: Arc<OpenAiClient>,
    model: String,
    vector_store_id: Option<String>,
    max_num_results: u32,
    instructions: &'static str,
}

impl FileSearchGenerator {
    /// Create from config
    pub fn from_config(client: Arc<OpenAiClient>, config: &AppConfig) -> Self {
        Self {
            client,
            model: config.openai.model.clone(),
            vector_store_id: config.bot.vector_store_id().map(str::to_string),
            max_num_results: config.bot.max_num_results,
            instructions: instructions_for(config.bot.instruction_style),
        }
    }

    pub fn build_request(&self, query: &Query, vector_store_id: &str) -> ResponseRequest {
        ResponseRequest {
            model: self.model.clone(),
            input: query.as_str().to_string(),
            instructions: self.instructions.to_string(),
            temperature: 0.0,
            tools: vec![Tool::FileSearch {
                vector_store_ids: vec![vector_store_id.to_string()],
                max_num_results: self.max_num_results,
            }],
            include: vec![FILE_SEARCH_INCLUDE.to_string()],
        }
    }
}

#[async_trait]
impl AnswerGenerator for FileSearchGenerator {
    async fn generate(&self, query: &Query) -> Result<String> {
        let vector_store_id = self
            .vector_store_id
            .as_deref()
            .ok_or_else(|| EccError::ConfigError(MISSING_VECTOR_STORE.to_string()))?;

        tracing::info!(
            query_len = query.as_str().len(),
            model = %self.model,
            "Generating response for query"
        );

        let request = self.build_request(query, vector_store_id);
        let response = match self.client.create_response(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Error generating response");
                return Err(e);
            }
        };

        match response.output_text() {
            Some(text) => {
                tracing::info!(
                    response_id = %response.id,
                    answer_len = text.len(),
                    search_results = response.search_result_count(),
                    cited = ?response.cited_files(),
                    "Response generated successfully"
                );
                Ok(text.to_string())
            }
            None => {
                tracing::error!(response_id = %response.id, "Response missing message text");
                Err(EccError::EmptyGeneration)
            }
        }
    }
}
