//! Retrieval engine - answers questions about a journal
//!
//! Query path: embed + classify the question, k-NN over the published
//! generation, resolve hits against the entry store, keep the requester's
//! entries, then apply the sentiment gate.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::classifier::SentimentGateway;
use super::embedding::EmbeddingGateway;
use super::index::SearchHit;
use super::lifecycle::{IndexManager, RebuildOutcome};
use crate::core::config::{Config, DEFAULT_K_CANDIDATES, DEFAULT_MAX_RESULTS};
use crate::core::entry::EntryRecord;
use crate::core::sentiment::Sentiment;
use crate::core::store::EntryStore;
use crate::error::{EngineError, EngineResult};

/// Headline reported when the index holds no vectors
pub const INSUFFICIENT_DATA: &str = "insufficient data";

/// A search hit joined with its entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub entry_id: i64,
    pub owner_id: i64,
    pub text: String,
    pub sentiment_label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub distance: f32,
}

impl Candidate {
    fn from_hit(record: EntryRecord, hit: &SearchHit) -> Self {
        Self {
            entry_id: record.entry_id,
            owner_id: record.owner_id,
            text: record.text,
            sentiment_label: record.sentiment_label,
            created_at: record.created_at,
            distance: hit.distance,
        }
    }

    fn matches(&self, sentiment: Sentiment) -> bool {
        sentiment.is_label_of(self.sentiment_label.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalResult {
    pub candidates: Vec<Candidate>,
    pub headline_sentiment: String,
    /// Generation the query ran against
    pub generation: u64,
}

impl RetrievalResult {
    pub fn insufficient_data(generation: u64) -> Self {
        Self {
            candidates: Vec::new(),
            headline_sentiment: INSUFFICIENT_DATA.to_string(),
            generation,
        }
    }

    pub fn is_insufficient_data(&self) -> bool {
        self.headline_sentiment == INSUFFICIENT_DATA
    }

    /// Short conversational reply built from the candidates
    pub fn summary(&self) -> String {
        if self.is_insufficient_data() {
            return "There aren't enough journal entries indexed to answer that yet.".to_string();
        }
        if self.candidates.is_empty() {
            return format!(
                "None of your entries seem related to that question (mood: {}).",
                self.headline_sentiment
            );
        }

        let mut reply = format!(
            "Here is what you wrote that comes closest (mood: {}):",
            self.headline_sentiment
        );
        for candidate in &self.candidates {
            reply.push_str(&format!(
                "\n- {}: {}",
                candidate.created_at.format("%Y-%m-%d"),
                candidate.text
            ));
        }
        reply
    }
}

/// Snapshot of index health
#[derive(Debug, Clone, Serialize)]
pub struct IndexStatus {
    pub generation: u64,
    pub vector_count: usize,
    pub dimension: usize,
    pub built_at: DateTime<Utc>,
    pub skipped_empty: usize,
    pub stale: bool,
    pub pending_changes: u64,
    pub rebuilding: bool,
    pub last_error: Option<String>,
}

/// Sentiment gate over distance-ordered, owner-filtered candidates.
///
/// Neutral questions take the nearest `max_results`. Otherwise candidates
/// labelled with the question's sentiment win outright; only when none exist
/// does the plain distance order apply. Results are never padded.
pub fn select_candidates(
    candidates: Vec<Candidate>,
    query_sentiment: Sentiment,
    max_results: usize,
) -> Vec<Candidate> {
    if query_sentiment.is_neutral() {
        return candidates.into_iter().take(max_results).collect();
    }

    let (matching, rest): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| c.matches(query_sentiment));

    if matching.is_empty() {
        rest.into_iter().take(max_results).collect()
    } else {
        matching.into_iter().take(max_results).collect()
    }
}

/// Shared retrieval engine; cheap to share behind an `Arc` across threads
pub struct RetrievalEngine {
    store: Arc<dyn EntryStore>,
    embedder: Arc<dyn EmbeddingGateway>,
    classifier: Arc<dyn SentimentGateway>,
    index: IndexManager,
    k_candidates: usize,
    max_results: usize,
}

impl RetrievalEngine {
    /// Fails if the embedding gateway reports a zero dimension
    pub fn new(
        store: Arc<dyn EntryStore>,
        embedder: Arc<dyn EmbeddingGateway>,
        classifier: Arc<dyn SentimentGateway>,
    ) -> EngineResult<Self> {
        let dimension = embedder.dimension();
        if dimension == 0 {
            return Err(EngineError::EmbeddingFailure(
                "embedding gateway reports dimension 0".to_string(),
            ));
        }

        Ok(Self {
            store,
            embedder,
            classifier,
            index: IndexManager::new(dimension),
            k_candidates: DEFAULT_K_CANDIDATES,
            max_results: DEFAULT_MAX_RESULTS,
        })
    }

    pub fn with_config(mut self, config: &Config) -> Self {
        self.k_candidates = config.k_candidates.max(1);
        self.max_results = config.max_results.max(1);
        self
    }

    /// Build the first generation before serving; never fails
    pub fn on_startup(&self) -> u64 {
        self.index
            .on_startup(self.store.as_ref(), self.embedder.as_ref())
            .id()
    }

    pub fn rebuild_index(&self) -> EngineResult<RebuildOutcome> {
        self.index.rebuild(self.store.as_ref(), self.embedder.as_ref())
    }

    pub fn on_write(&self, entry: &EntryRecord) {
        self.index.on_write(entry);
    }

    pub fn on_delete(&self, entry_id: i64) {
        self.index.on_delete(entry_id);
    }

    /// Raw k-NN against the published generation
    pub fn search(&self, query_vector: &[f32], k: usize) -> EngineResult<Vec<SearchHit>> {
        self.index.current().search(query_vector, k)
    }

    pub fn answer_question(
        &self,
        query_text: &str,
        requester_owner_id: i64,
    ) -> EngineResult<RetrievalResult> {
        // One generation for the whole query, even if a rebuild publishes meanwhile
        let generation = self.index.current();
        if generation.is_empty() {
            return Ok(RetrievalResult::insufficient_data(generation.id()));
        }

        let query_vector = self.embedder.embed(query_text)?;
        let query_sentiment = self.classifier.classify(query_text)?;

        let hits = generation.search(&query_vector, self.k_candidates)?;
        let candidates = self.resolve(&hits, requester_owner_id);
        let total = candidates.len();
        let candidates = select_candidates(candidates, query_sentiment, self.max_results);

        tracing::debug!(
            generation = generation.id(),
            hits = hits.len(),
            owned = total,
            returned = candidates.len(),
            sentiment = %query_sentiment,
            "answered question"
        );

        Ok(RetrievalResult {
            candidates,
            headline_sentiment: query_sentiment.to_string(),
            generation: generation.id(),
        })
    }

    /// Join hits with their entries, keeping only the requester's.
    /// Entries deleted since the build, or unreadable, are dropped.
    fn resolve(&self, hits: &[SearchHit], requester_owner_id: i64) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(hits.len());
        for hit in hits {
            match self.store.get_entry(hit.entry_id) {
                Ok(Some(record)) if record.owner_id == requester_owner_id => {
                    candidates.push(Candidate::from_hit(record, hit));
                }
                Ok(Some(_)) => {}
                Ok(None) => {
                    tracing::debug!(entry_id = hit.entry_id, "indexed entry no longer exists");
                }
                Err(e) => {
                    tracing::warn!(entry_id = hit.entry_id, error = %e, "failed to resolve entry");
                }
            }
        }
        candidates
    }

    pub fn status(&self) -> IndexStatus {
        let generation = self.index.current();
        IndexStatus {
            generation: generation.id(),
            vector_count: generation.len(),
            dimension: generation.dimension(),
            built_at: generation.built_at(),
            skipped_empty: generation.stats().skipped_empty,
            stale: self.index.is_stale(),
            pending_changes: self.index.pending_changes(),
            rebuilding: self.index.is_rebuilding(),
            last_error: self.index.last_error(),
        }
    }
}
