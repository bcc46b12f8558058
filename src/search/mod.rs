//! Semantic retrieval engine for journal entries
//!
//! Exact flat k-NN over immutable index generations, owner filtering at read
//! time, and a sentiment gate over the nearest candidates.

pub mod classifier;
pub mod embedding;
pub mod engine;
pub mod index;
pub mod lifecycle;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::{LexiconClassifier, SentimentGateway};
pub use embedding::{EmbeddingGateway, HarmonicEmbedder, HARMONIC_DIM};
pub use engine::{Candidate, IndexStatus, RetrievalEngine, RetrievalResult, INSUFFICIENT_DATA};
pub use index::{Generation, IndexEntry, SearchHit};
pub use lifecycle::{IndexManager, RebuildOutcome};
