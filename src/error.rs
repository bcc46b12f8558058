//! Engine error taxonomy
//!
//! An empty index and an unresolvable entry are not errors: the first is
//! reported as an "insufficient data" result, the second is dropped.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Embedding gateway unreachable, model error, or a vector of the wrong dimension
    #[error("embedding failed: {0}")]
    EmbeddingFailure(String),

    /// Sentiment gateway unreachable or model error
    #[error("sentiment classification failed: {0}")]
    ClassificationFailure(String),

    /// Entry store could not be listed during a rebuild
    #[error("entry store error: {0}")]
    Store(String),

    #[error("k must be at least 1")]
    InvalidK,
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
