//! ECC Core - Configuration, shared types, and component traits
//!
//! This crate defines the abstractions shared by the bot crates:
//! - Process-wide configuration
//! - Common error types
//! - The validated user query
//! - Batch indexing records and summaries
//! - Traits for the classifier, the generator, and the vector store backend

pub mod config;

pub use config::{
    AppConfig, BotConfig, ConfigError, IndexerConfig, InstructionStyle, LoggingConfig,
    OpenAiConfig, ServerConfig,
};

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Message returned when no vector store id is configured
pub const MISSING_VECTOR_STORE: &str = "VECTORDBID environment variable not set.";

/// Core error types for bot operations
#[derive(Error, Debug)]
pub enum EccError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    ConfigError(String),

    /// Upstream fault; the message is surfaced to callers as-is
    #[error("{0}")]
    LlmError(String),

    /// The model answered without producing a message item
    #[error("No message item in model output")]
    EmptyGeneration,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ConfigError> for EccError {
    fn from(err: ConfigError) -> Self {
        EccError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EccError>;

// ============================================================================
// Query
// ============================================================================

/// A user question that is guaranteed to be non-blank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    /// Validate and wrap user input. Blank input is rejected.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(EccError::ValidationError(
                "query must not be empty".to_string(),
            ));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Indexing Models
// ============================================================================

/// Outcome of a single file upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Success,
    Failed,
}

/// Per-file result of the batch indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexUploadRecord {
    /// File name (without directory)
    pub file: String,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IndexUploadRecord {
    pub fn success(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            status: UploadStatus::Success,
            error: None,
        }
    }

    pub fn failed(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            status: UploadStatus::Failed,
            error: Some(error.into()),
        }
    }
}

/// Aggregate counts of a batch indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub total_files: usize,
    pub successful_uploads: usize,
    pub failed_uploads: usize,
    /// Failed records only
    pub errors: Vec<IndexUploadRecord>,
}

impl IndexSummary {
    /// Start a summary for `total_files` inputs
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            ..Default::default()
        }
    }

    /// Fold one upload result into the counts
    pub fn record(&mut self, record: IndexUploadRecord) {
        match record.status {
            UploadStatus::Success => self.successful_uploads += 1,
            UploadStatus::Failed => {
                self.failed_uploads += 1;
                self.errors.push(record);
            }
        }
    }

    /// Number of results recorded so far
    pub fn processed(&self) -> usize {
        self.successful_uploads + self.failed_uploads
    }
}

/// Vector store details reported by the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorStoreInfo {
    pub id: String,
    pub name: Option<String>,
    pub created_at: Option<i64>,
    pub file_count: u64,
}

// ============================================================================
// Traits
// ============================================================================

/// Decides whether a query is in the bot's domain
#[async_trait::async_trait]
pub trait RelevanceClassifier: Send + Sync {
    /// `true` when the query is relevant
    async fn classify(&self, query: &Query) -> Result<bool>;
}

/// Produces the answer text for a query
#[async_trait::async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Generate an answer.
    ///
    /// Returns [`EccError::EmptyGeneration`] when the model produced no
    /// message, and [`EccError::LlmError`] on upstream faults.
    async fn generate(&self, query: &Query) -> Result<String>;
}

/// Managed vector store operations used by the batch indexer
#[async_trait::async_trait]
pub trait VectorStoreBackend: Send + Sync {
    /// Create a named vector store
    async fn create_vector_store(&self, name: &str) -> Result<VectorStoreInfo>;

    /// Upload a local file, returning the remote file id
    async fn upload_file(&self, path: &Path) -> Result<String>;

    /// Attach an uploaded file to a vector store
    async fn attach_file(&self, vector_store_id: &str, file_id: &str) -> Result<()>;
}

// ============================================================================
// Tests
// ============================================================================
