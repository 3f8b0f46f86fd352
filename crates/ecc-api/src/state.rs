//! Application state management
//!
//! Author: hephaex@gmail.com

use ecc_core::{AnswerGenerator, AppConfig, RelevanceClassifier, Result};
use ecc_rag::{FileSearchGenerator, GuardrailClassifier, OpenAiClient};
use std::sync::Arc;

/// Application state shared across handlers.
///
/// Immutable after construction; requests never write to it.
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Relevance classifier, consulted only when guardrails are enabled
    pub classifier: Arc<dyn RelevanceClassifier>,
    /// Answer generator
    pub generator: Arc<dyn AnswerGenerator>,
}

impl AppState {
    /// Create state from explicit components
    pub fn new(
        config: AppConfig,
        classifier: Arc<dyn RelevanceClassifier>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            classifier,
            generator,
        }
    }

    /// Wire the OpenAI-backed components from config
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let client = Arc::new(OpenAiClient::from_config(&config.openai)?);
        let classifier = Arc::new(GuardrailClassifier::from_config(client.clone(), &config));
        let generator = Arc::new(FileSearchGenerator::from_config(client, &config));

        tracing::info!(
            model = %config.openai.model,
            guardrails = config.bot.enable_guardrails,
            vector_store_configured = config.bot.vector_store_id().is_some(),
            instruction_style = ?config.bot.instruction_style,
            "Bot components initialised"
        );

        Ok(Self::new(config, classifier, generator))
    }

    pub fn guardrails_enabled(&self) -> bool {
        self.config.bot.enable_guardrails
    }

    pub fn vector_store_configured(&self) -> bool {
        self.config.bot.vector_store_id().is_some()
    }
}
