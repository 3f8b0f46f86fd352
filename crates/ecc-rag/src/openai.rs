//! OpenAI API client
//!
//! Thin reqwest wrapper over the endpoints the bot consumes: Chat
//! Completions (guardrail), Responses (answer generation), Files and
//! Vector Stores (batch indexing). Every failure is mapped to
//! [`EccError::LlmError`] carrying a human-readable description.
//!
//! Author: hephaex@gmail.com

use crate::types::{
    ApiErrorBody, AttachFileRequest, ChatCompletionRequest, ChatCompletionResponse,
    CreateVectorStoreRequest, FileObject, ResponseObject, ResponseRequest, VectorStoreFileObject,
    VectorStoreObject,
};
use async_trait::async_trait;
use ecc_core::{EccError, OpenAiConfig, Result, VectorStoreBackend, VectorStoreInfo};
use reqwest::{multipart, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI API client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from config
    pub fn from_config(config: &OpenAiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .ok_or_else(|| EccError::ConfigError("OpenAI API key required".to_string()))?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| EccError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Set custom base URL (for proxies or compatible APIs)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /chat/completions`
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.post_json("chat/completions", request).await
    }

    /// `POST /responses`
    pub async fn create_response(&self, request: &ResponseRequest) -> Result<ResponseObject> {
        self.post_json("responses", request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| EccError::LlmError(format!("Request failed: {e}")))?;

        read_json(response).await
    }
}

/// Decode a successful body or turn the error body into an `LlmError`
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(status = status.as_u16(), error = %e, "Failed to read error body");
                String::new()
            }
        };
        return Err(upstream_error(status, &error_text));
    }

    response
        .json()
        .await
        .map_err(|e| EccError::LlmError(format!("Failed to parse response: {e}")))
}

fn upstream_error(status: StatusCode, body: &str) -> EccError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = if message.is_empty() {
        status.canonical_reason().unwrap_or("Unknown error").to_string()
    } else {
        message
    };

    EccError::LlmError(format!("OpenAI error ({}): {}", status.as_u16(), message))
}

#[async_trait]
impl VectorStoreBackend for OpenAiClient {
    async fn create_vector_store(&self, name: &str) -> Result<VectorStoreInfo> {
        let store: VectorStoreObject = self
            .post_json("vector_stores", &CreateVectorStoreRequest { name })
            .await?;

        Ok(VectorStoreInfo {
            id: store.id,
            name: store.name,
            created_at: store.created_at,
            file_count: store.file_counts.completed,
        })
    }

    async fn upload_file(&self, path: &Path) -> Result<String> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                EccError::ValidationError(format!("Not a file path: {}", path.display()))
            })?;
        let data = tokio::fs::read(path).await?;

        let form = multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", multipart::Part::bytes(data).file_name(file_name));

        let response = self
            .client
            .post(self.url("files"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| EccError::LlmError(format!("Upload failed: {e}")))?;

        let file: FileObject = read_json(response).await?;
        Ok(file.id)
    }

    async fn attach_file(&self, vector_store_id: &str, file_id: &str) -> Result<()> {
        let _: VectorStoreFileObject = self
            .post_json(
                &format!("vector_stores/{vector_store_id}/files"),
                &AttachFileRequest { file_id },
            )
            .await?;
        Ok(())
    }
}
