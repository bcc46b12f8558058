//! Flat vector index generations
//!
//! A [`Generation`] is one immutable, fully built index: vectors stored
//! row-major in a single buffer, co-indexed with `slot_to_entry`. Search is an
//! exact linear scan by squared Euclidean distance, O(N·D) per query, which is
//! fine for a journal of a few thousand entries.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::embedding::EmbeddingGateway;
use crate::core::entry::EntryRecord;
use crate::error::{EngineError, EngineResult};

/// Link between a geometric position and a logical entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub slot: usize,
    pub entry_id: i64,
}

/// One nearest-neighbor hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchHit {
    pub entry_id: i64,
    pub slot: usize,
    /// Squared Euclidean distance to the query
    pub distance: f32,
}

/// Outcome counts of building a generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub indexed: usize,
    /// Entries with blank text
    pub skipped_empty: usize,
    /// Repeated entry ids after the first occurrence
    pub skipped_duplicate: usize,
}

#[derive(Debug)]
pub struct Generation {
    id: u64,
    dimension: usize,
    vectors: Vec<f32>,
    slot_to_entry: Vec<IndexEntry>,
    built_at: DateTime<Utc>,
    stats: BuildStats,
}

impl Generation {
    /// Generation 0: no vectors
    pub fn empty(dimension: usize) -> Self {
        Self {
            id: 0,
            dimension,
            vectors: Vec::new(),
            slot_to_entry: Vec::new(),
            built_at: Utc::now(),
            stats: BuildStats::default(),
        }
    }

    /// Embed every entry with text and build a complete generation.
    ///
    /// All-or-nothing: any embedding error or malformed vector fails the
    /// whole build.
    pub fn build(
        id: u64,
        entries: &[EntryRecord],
        embedder: &dyn EmbeddingGateway,
    ) -> EngineResult<Self> {
        let mut stats = BuildStats::default();
        let mut seen = HashSet::new();
        let mut selected = Vec::with_capacity(entries.len());

        for entry in entries {
            if !entry.has_text() {
                stats.skipped_empty += 1;
            } else if !seen.insert(entry.entry_id) {
                tracing::warn!(entry_id = entry.entry_id, "duplicate entry id in store listing");
                stats.skipped_duplicate += 1;
            } else {
                selected.push(entry);
            }
        }

        let texts: Vec<&str> = selected.iter().map(|e| e.text.as_str()).collect();
        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed_batch(&texts)?
        };

        if embeddings.len() != selected.len() {
            return Err(EngineError::EmbeddingFailure(format!(
                "gateway returned {} vectors for {} texts",
                embeddings.len(),
                selected.len()
            )));
        }

        let rows = selected
            .iter()
            .map(|e| e.entry_id)
            .zip(embeddings)
            .collect::<Vec<_>>();
        let mut generation = Self::from_vectors(id, embedder.dimension(), rows)?;
        stats.indexed = generation.len();
        generation.stats = stats;
        Ok(generation)
    }

    /// Assemble a generation from precomputed `(entry_id, vector)` rows.
    /// Rows keep their order; row `i` becomes slot `i`.
    pub fn from_vectors(
        id: u64,
        dimension: usize,
        rows: Vec<(i64, Vec<f32>)>,
    ) -> EngineResult<Self> {
        if dimension == 0 {
            return Err(EngineError::EmbeddingFailure(
                "embedding dimension must be non-zero".to_string(),
            ));
        }

        let mut vectors = Vec::with_capacity(rows.len() * dimension);
        let mut slot_to_entry = Vec::with_capacity(rows.len());

        for (slot, (entry_id, vector)) in rows.into_iter().enumerate() {
            if vector.len() != dimension {
                return Err(EngineError::EmbeddingFailure(format!(
                    "entry {} embedded to {} dimensions, expected {}",
                    entry_id,
                    vector.len(),
                    dimension
                )));
            }
            if vector.iter().any(|x| !x.is_finite()) {
                return Err(EngineError::EmbeddingFailure(format!(
                    "entry {} embedded to a non-finite vector",
                    entry_id
                )));
            }
            vectors.extend_from_slice(&vector);
            slot_to_entry.push(IndexEntry { slot, entry_id });
        }

        Ok(Self {
            id,
            dimension,
            vectors,
            stats: BuildStats {
                indexed: slot_to_entry.len(),
                ..BuildStats::default()
            },
            slot_to_entry,
            built_at: Utc::now(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.slot_to_entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_to_entry.is_empty()
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.slot_to_entry
    }

    /// Up to `k` nearest entries, ascending by distance, ties by ascending slot
    pub fn search(&self, query: &[f32], k: usize) -> EngineResult<Vec<SearchHit>> {
        if k == 0 {
            return Err(EngineError::InvalidK);
        }
        if self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(EngineError::EmbeddingFailure(format!(
                "query has {} dimensions, index has {}",
                query.len(),
                self.dimension
            )));
        }

        let mut hits: Vec<SearchHit> = self
            .slot_to_entry
            .iter()
            .zip(self.vectors.chunks_exact(self.dimension))
            .map(|(entry, vector)| SearchHit {
                entry_id: entry.entry_id,
                slot: entry.slot,
                distance: squared_euclidean(query, vector),
            })
            .collect();

        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, by_distance_then_slot);
            hits.truncate(k);
        }
        hits.sort_unstable_by(by_distance_then_slot);

        Ok(hits)
    }
}

fn by_distance_then_slot(a: &SearchHit, b: &SearchHit) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.slot.cmp(&b.slot))
}

#[inline]
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
