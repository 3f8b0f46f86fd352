//! Batch indexer
//!
//! Uploads every file of a directory into a managed vector store with a
//! bounded number of uploads in flight. A failed file is recorded in the
//! summary and never stops the batch.
//!
//! Author: hephaex@gmail.com

use ecc_core::{
    IndexSummary, IndexUploadRecord, Result, VectorStoreBackend, VectorStoreInfo,
};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which vector store the indexer writes into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// Create a new store with this name
    Create(String),
    /// Reuse an existing store id
    Existing(String),
}

/// Uploads a directory of documents into a vector store
pub struct BatchIndexer {
    backend: Arc<dyn VectorStoreBackend>,
    concurrency: usize,
}

impl BatchIndexer {
    pub fn new(backend: Arc<dyn VectorStoreBackend>, concurrency: usize) -> Self {
        Self {
            backend,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Create the target store, or describe the existing one
    pub async fn ensure_store(&self, target: &StoreTarget) -> Result<VectorStoreInfo> {
        match target {
            StoreTarget::Create(name) => {
                let info = self.backend.create_vector_store(name).await?;
                tracing::info!(id = %info.id, name = %name, "Vector store created");
                Ok(info)
            }
            StoreTarget::Existing(id) => {
                tracing::info!(id = %id, "Reusing vector store");
                Ok(VectorStoreInfo {
                    id: id.clone(),
                    name: None,
                    created_at: None,
                    file_count: 0,
                })
            }
        }
    }

    /// Upload every file of `dir` into the target store
    pub async fn run(&self, dir: &Path, target: &StoreTarget) -> Result<(VectorStoreInfo, IndexSummary)> {
        let files = collect_files(dir)?;
        let store = self.ensure_store(target).await?;
        let summary = self.upload_all(&store.id, files).await;
        Ok((store, summary))
    }

    /// Upload and attach each file; results are folded as they complete
    pub async fn upload_all(&self, vector_store_id: &str, files: Vec<PathBuf>) -> IndexSummary {
        let total = files.len();
        tracing::info!(
            total,
            concurrency = self.concurrency,
            "Uploading files to vector store"
        );

        stream::iter(files)
            .map(|path| self.upload_one(vector_store_id, path))
            .buffer_unordered(self.concurrency)
            .fold(IndexSummary::new(total), |mut summary, record| async move {
                summary.record(record);
                tracing::debug!(done = summary.processed(), total, "Upload progress");
                summary
            })
            .await
    }

    async fn upload_one(&self, vector_store_id: &str, path: PathBuf) -> IndexUploadRecord {
        let file_name = display_name(&path);

        let result = async {
            let file_id = self.backend.upload_file(&path).await?;
            self.backend.attach_file(vector_store_id, &file_id).await
        }
        .await;

        match result {
            Ok(()) => IndexUploadRecord::success(file_name),
            Err(e) => {
                tracing::warn!(file = %file_name, error = %e, "Upload failed");
                IndexUploadRecord::failed(file_name, e.to_string())
            }
        }
    }
}

/// Regular files directly inside `dir`, sorted by path
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
