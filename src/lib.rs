//! kairo-recall library
//!
//! Semantic retrieval over a personal journal: "ask a question about your
//! journal" answered from the entries nearest to the question, preferring
//! entries written in the same mood.
//!
//! # Modules
//!
//! - `core`: Entry records, sentiment labels, entry stores, configuration
//! - `search`: Embedding/sentiment gateways, vector index, retrieval engine
//! - `error`: Engine error taxonomy

pub mod core;
pub mod error;
pub mod search;

// Re-exports for convenience
pub use crate::core::config::Config;
pub use crate::core::entry::EntryRecord;
pub use crate::core::paths::KairoPaths;
pub use crate::core::sentiment::Sentiment;
pub use crate::core::store::{EntryStore, MemoryEntryStore, SqliteEntryStore};
pub use error::{EngineError, EngineResult};
pub use search::{
    Candidate, EmbeddingGateway, HarmonicEmbedder, LexiconClassifier, RebuildOutcome,
    RetrievalEngine, RetrievalResult, SentimentGateway,
};
