//! ECC CLI - Command-line interface
//!
//! Usage:
//!   ecc index [--dir PAGES/cleaned] [--store-name NAME | --vector-store-id ID]
//!   ecc ask <query>
//!   ecc invoke [--event event.json]
//!
//! Author: hephaex@gmail.com

use anyhow::Context;
use clap::{Parser, Subcommand};
use ecc_api::{
    adapter::{self, BotRequest},
    gateway::{self, GatewayRequest},
    load_config,
    state::AppState,
    telemetry,
};
use ecc_core::{AppConfig, VectorStoreBackend};
use ecc_rag::{BatchIndexer, OpenAiClient, StoreTarget};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

#[derive(Parser)]
#[command(name = "ecc")]
#[command(about = "ECC Provost bot tools")]
#[command(version)]
struct Cli {
    /// TOML config file; environment variables override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload cleaned documents into a vector store
    Index {
        /// Directory of documents to upload
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Name for the new vector store
        #[arg(long, conflicts_with = "vector_store_id")]
        store_name: Option<String>,
        /// Add files to this existing store instead of creating one
        #[arg(long)]
        vector_store_id: Option<String>,
        /// Maximum concurrent uploads
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Ask the bot one question
    Ask {
        /// Question to ask
        query: String,
    },
    /// Run one serverless gateway event through the bot
    Invoke {
        /// Event JSON file; stdin when omitted
        #[arg(long)]
        event: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config)?;
    telemetry::init_tracing(&config.logging);
    config.require_api_key()?;

    match cli.command {
        Commands::Index {
            dir,
            store_name,
            vector_store_id,
            concurrency,
        } => {
            let dir = dir.unwrap_or_else(|| config.indexer.documents_dir.clone());
            let target = match vector_store_id {
                Some(id) => StoreTarget::Existing(id),
                None => StoreTarget::Create(
                    store_name.unwrap_or_else(|| config.indexer.store_name.clone()),
                ),
            };
            index(&config, &dir, &target, concurrency).await
        }
        Commands::Ask { query } => ask(config, query).await,
        Commands::Invoke { event } => invoke(config, event).await,
    }
}

async fn index(
    config: &AppConfig,
    dir: &std::path::Path,
    target: &StoreTarget,
    concurrency: Option<usize>,
) -> anyhow::Result<()> {
    let backend: Arc<dyn VectorStoreBackend> = Arc::new(OpenAiClient::from_config(&config.openai)?);
    let indexer = BatchIndexer::new(
        backend,
        concurrency.unwrap_or(config.indexer.concurrency),
    );

    let (store, summary) = indexer
        .run(dir, target)
        .await
        .with_context(|| format!("Indexing {} failed", dir.display()))?;

    let report = serde_json::json!({
        "vector_store": &store,
        "summary": &summary,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if summary.failed_uploads > 0 {
        tracing::warn!(
            failed = summary.failed_uploads,
            total = summary.total_files,
            "Some uploads failed"
        );
    }
    Ok(())
}

async fn ask(config: AppConfig, query: String) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let body = serde_json::json!({ "query": query }).to_string();

    let response = adapter::handle(&state, BotRequest::post(body)).await;
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    if !response.status.is_success() {
        anyhow::bail!("Bot answered with status {}", response.status);
    }
    Ok(())
}

async fn invoke(config: AppConfig, event: Option<PathBuf>) -> anyhow::Result<()> {
    let raw = match event {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read event {}", path.display()))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            raw
        }
    };
    let event: GatewayRequest = serde_json::from_str(&raw).context("Invalid gateway event")?;

    let state = AppState::from_config(config)?;
    let response = gateway::invoke(&state, event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
