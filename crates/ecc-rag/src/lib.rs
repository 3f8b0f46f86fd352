//! ECC RAG - Hosted retrieval-augmented generation
//!
//! Retrieval, ranking and generation all happen inside the OpenAI API;
//! this crate only shapes the calls and reads the results:
//! - [`GuardrailClassifier`]: optional relevance check before answering
//! - [`FileSearchGenerator`]: Responses call with the `file_search` tool
//! - [`BatchIndexer`]: one-off upload of cleaned documents into a vector store
//!
//! Author: hephaex@gmail.com

pub mod generator;
pub mod guardrail;
pub mod indexer;
pub mod instructions;
pub mod openai;
pub mod types;

pub use generator::FileSearchGenerator;
pub use guardrail::GuardrailClassifier;
pub use indexer::{collect_files, BatchIndexer, StoreTarget};
pub use instructions::instructions_for;
pub use openai::OpenAiClient;
