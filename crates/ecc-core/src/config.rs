//! ECC Bot Configuration Management
//!
//! Handles configuration from environment variables and TOML config files,
//! with defaults matching the deployed bot. The configuration is built once
//! at process start and passed to every component; nothing below the
//! binaries reads the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// OpenAI API configuration
    pub openai: OpenAiConfig,

    /// Bot behaviour (vector store, guardrails, instructions)
    pub bot: BotConfig,

    /// Batch indexer configuration
    pub indexer: IndexerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// `from_env` is this function over `std::env::var`; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(self)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            self.server.port = parse_value("API_PORT", &port)?;
        }

        // OpenAI
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
            self.openai.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.openai.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("OPENAI_TIMEOUT_SECS") {
            self.openai.timeout_secs = Some(parse_value("OPENAI_TIMEOUT_SECS", &secs)?);
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.openai.model = model;
        }
        if let Some(model) = lookup("GUARDRAIL_MODEL") {
            self.openai.guardrail_model = model;
        }

        // Bot
        if let Some(id) = lookup("VECTORDBID") {
            self.bot.vector_store_id = Some(id).filter(|id| !id.is_empty());
        }
        if let Some(flag) = lookup("ENABLE_GUARDRAILS") {
            self.bot.enable_guardrails = parse_flag("ENABLE_GUARDRAILS", &flag)?;
        }
        if let Some(style) = lookup("INSTRUCTION_STYLE") {
            self.bot.instruction_style = style.parse()?;
        }

        // Indexer
        if let Some(name) = lookup("VECTOR_STORE_NAME") {
            self.indexer.store_name = name;
        }
        if let Some(dir) = lookup("DOCUMENTS_DIR") {
            self.indexer.documents_dir = PathBuf::from(dir);
        }
        if let Some(n) = lookup("INDEX_CONCURRENCY") {
            self.indexer.concurrency = parse_value("INDEX_CONCURRENCY", &n)?;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.json_format = format.eq_ignore_ascii_case("json");
        }

        Ok(())
    }

    /// The OpenAI API key, or an error naming the variable to set
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.openai
            .api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingRequired("OPENAI_API_KEY".to_string()))
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

/// OpenAI API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key (bearer credential)
    pub api_key: Option<String>,

    /// API base URL
    pub base_url: String,

    /// Model used for answer generation
    pub model: String,

    /// Model used for the guardrail classification call
    pub guardrail_model: String,

    /// Client timeout in seconds; reqwest defaults apply when unset
    pub timeout_secs: Option<u64>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            guardrail_model: "gpt-3.5-turbo".to_string(),
            timeout_secs: None,
        }
    }
}

/// Bot behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Vector store searched by the `file_search` tool
    pub vector_store_id: Option<String>,

    /// Run the relevance classifier before generating
    pub enable_guardrails: bool,

    /// Which instruction template the generator sends
    pub instruction_style: InstructionStyle,

    /// `max_num_results` of the `file_search` tool
    pub max_num_results: u32,
}

impl BotConfig {
    /// The vector store id, if set and non-empty
    pub fn vector_store_id(&self) -> Option<&str> {
        self.vector_store_id.as_deref().filter(|id| !id.is_empty())
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            vector_store_id: None,
            enable_guardrails: false,
            instruction_style: InstructionStyle::default(),
            max_num_results: 10,
        }
    }
}

/// Instruction template selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionStyle {
    /// Copy-ready replies the user pastes back to a client
    #[default]
    Reply,
    /// Direct answers to the person asking
    Direct,
}

impl std::str::FromStr for InstructionStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reply" => Ok(Self::Reply),
            "direct" => Ok(Self::Direct),
            _ => Err(ConfigError::InvalidValue {
                key: "INSTRUCTION_STYLE".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Batch indexer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Name given to a newly created vector store
    pub store_name: String,

    /// Directory of cleaned text files to upload
    pub documents_dir: PathBuf,

    /// Maximum concurrent uploads
    pub concurrency: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            store_name: "ECC_Knowledge_Base".to_string(),
            documents_dir: PathBuf::from("PAGES/cleaned"),
            concurrency: 10,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
