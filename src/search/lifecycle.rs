//! Index lifecycle: rebuild policy and generation publication
//!
//! The published generation sits behind an [`ArcSwap`]. Readers pin one
//! `Arc<Generation>` per query and never block; a rebuild embeds everything
//! off to the side and publishes with a single `store`. Old generations are
//! freed when the last in-flight query drops its `Arc`.
//!
//! Entry writes and deletes never patch the index. They only mark it stale;
//! freshness requires an explicit [`IndexManager::rebuild`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::{ArcSwap, ArcSwapOption};
use serde::Serialize;

use super::embedding::EmbeddingGateway;
use super::index::{BuildStats, Generation};
use crate::core::entry::EntryRecord;
use crate::core::store::EntryStore;
use crate::error::{EngineError, EngineResult};

/// Result of a rebuild request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RebuildOutcome {
    Published {
        generation: u64,
        stats: BuildStats,
        duration_ms: u128,
    },
    /// Another rebuild was already running; this request was dropped
    Coalesced { current_generation: u64 },
}

impl RebuildOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Published { generation, .. } => *generation,
            Self::Coalesced { current_generation } => *current_generation,
        }
    }
}

pub struct IndexManager {
    current: ArcSwap<Generation>,
    rebuilding: AtomicBool,
    pending_changes: AtomicU64,
    last_error: ArcSwapOption<String>,
}

/// Clears the in-flight flag on every exit path
struct RebuildGuard<'a>(&'a AtomicBool);

impl Drop for RebuildGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl IndexManager {
    pub fn new(dimension: usize) -> Self {
        Self {
            current: ArcSwap::from_pointee(Generation::empty(dimension)),
            rebuilding: AtomicBool::new(false),
            pending_changes: AtomicU64::new(0),
            last_error: ArcSwapOption::empty(),
        }
    }

    /// Pin the published generation
    pub fn current(&self) -> Arc<Generation> {
        self.current.load_full()
    }

    pub fn is_rebuilding(&self) -> bool {
        self.rebuilding.load(Ordering::Acquire)
    }

    /// Entry mutations seen since the published generation was built
    pub fn pending_changes(&self) -> u64 {
        self.pending_changes.load(Ordering::Acquire)
    }

    pub fn is_stale(&self) -> bool {
        self.pending_changes() > 0
    }

    /// Message of the most recent failed rebuild, cleared by a successful one
    pub fn last_error(&self) -> Option<String> {
        self.last_error.load_full().map(|e| e.as_ref().clone())
    }

    /// Full rebuild from the entry store.
    ///
    /// Coalesces: while one rebuild runs, further calls return
    /// [`RebuildOutcome::Coalesced`] immediately. On failure the previous
    /// generation stays published.
    pub fn rebuild(
        &self,
        store: &dyn EntryStore,
        embedder: &dyn EmbeddingGateway,
    ) -> EngineResult<RebuildOutcome> {
        if self
            .rebuilding
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            let current_generation = self.current.load().id();
            tracing::debug!(current_generation, "rebuild already in flight, coalescing");
            return Ok(RebuildOutcome::Coalesced { current_generation });
        }
        let _guard = RebuildGuard(&self.rebuilding);

        match self.build_and_publish(store, embedder) {
            Ok(outcome) => {
                self.last_error.store(None);
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(error = %e, "index rebuild failed, keeping previous generation");
                self.last_error.store(Some(Arc::new(e.to_string())));
                Err(e)
            }
        }
    }

    fn build_and_publish(
        &self,
        store: &dyn EntryStore,
        embedder: &dyn EmbeddingGateway,
    ) -> EngineResult<RebuildOutcome> {
        let start = Instant::now();
        let observed_changes = self.pending_changes();

        let entries = store
            .list_all_entries()
            .map_err(|e| EngineError::Store(format!("{e:#}")))?;

        // Rebuilds are serialized by the in-flight flag, so this id is unique
        let id = self.current.load().id() + 1;
        let generation = Generation::build(id, &entries, embedder)?;
        let stats = generation.stats();

        self.current.store(Arc::new(generation));
        self.pending_changes.fetch_sub(observed_changes, Ordering::AcqRel);

        let duration_ms = start.elapsed().as_millis();
        tracing::info!(
            generation = id,
            indexed = stats.indexed,
            skipped_empty = stats.skipped_empty,
            duration_ms = duration_ms as u64,
            "published index generation"
        );

        Ok(RebuildOutcome::Published {
            generation: id,
            stats,
            duration_ms,
        })
    }

    /// Initial rebuild before serving queries. A failure leaves the empty
    /// generation in place rather than preventing startup.
    pub fn on_startup(
        &self,
        store: &dyn EntryStore,
        embedder: &dyn EmbeddingGateway,
    ) -> Arc<Generation> {
        if let Err(e) = self.rebuild(store, embedder) {
            tracing::warn!(error = %e, "startup index build failed, serving an empty index");
        }
        self.current()
    }

    /// Record that an entry changed. The index is not patched.
    pub fn on_write(&self, entry: &EntryRecord) {
        let pending = self.pending_changes.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(entry_id = entry.entry_id, pending, "entry written, index now stale");
    }

    /// Record that an entry was deleted. Hits on it are dropped at query time.
    pub fn on_delete(&self, entry_id: i64) {
        let pending = self.pending_changes.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::debug!(entry_id, pending, "entry deleted, index now stale");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryEntryStore;
    use crate::search::testing::StubEmbedder;
    use std::sync::Barrier;
    use std::time::Duration;

    fn store() -> MemoryEntryStore {
        MemoryEntryStore::from_entries([
            EntryRecord::new(1, 1, "one"),
            EntryRecord::new(2, 1, "two"),
        ])
    }

    fn embedder() -> StubEmbedder {
        StubEmbedder::new(2)
            .with("one", vec![1.0, 0.0])
            .with("two", vec![0.0, 1.0])
    }

    #[test]
    fn test_starts_empty() {
        let manager = IndexManager::new(2);
        assert_eq!(manager.current().id(), 0);
        assert!(manager.current().is_empty());
    }

    #[test]
    fn test_rebuild_publishes_monotonic_generations() -> anyhow::Result<()> {
        let manager = IndexManager::new(2);
        let (store, embedder) = (store(), embedder());

        let first = manager.rebuild(&store, &embedder)?;
        let second = manager.rebuild(&store, &embedder)?;
        assert_eq!(first.generation(), 1);
        assert_eq!(second.generation(), 2);
        assert_eq!(manager.current().len(), 2);
        Ok(())
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_generation() -> anyhow::Result<()> {
        let manager = IndexManager::new(2);
        let (store, embedder) = (store(), embedder());
        manager.rebuild(&store, &embedder)?;

        embedder.fail_on("two");
        store.insert(EntryRecord::new(3, 1, "three"));
        assert!(manager.rebuild(&store, &embedder).is_err());

        let current = manager.current();
        assert_eq!(current.id(), 1);
        assert_eq!(current.len(), 2);
        assert!(manager.last_error().is_some());
        assert!(!manager.is_rebuilding());

        embedder.clear_failures();
        assert_eq!(manager.rebuild(&store, &embedder)?.generation(), 2);
        assert!(manager.last_error().is_none());
        Ok(())
    }

    #[test]
    fn test_startup_failure_degrades_to_empty() {
        let manager = IndexManager::new(2);
        let embedder = embedder().failing_on("one");
        let generation = manager.on_startup(&store(), &embedder);
        assert!(generation.is_empty());
        assert_eq!(generation.id(), 0);
    }

    #[test]
    fn test_writes_mark_stale_without_patching() -> anyhow::Result<()> {
        let manager = IndexManager::new(2);
        let (store, embedder) = (store(), embedder());
        manager.rebuild(&store, &embedder)?;

        let entry = EntryRecord::new(3, 1, "three");
        store.insert(entry.clone());
        manager.on_write(&entry);
        manager.on_delete(1);

        assert!(manager.is_stale());
        assert_eq!(manager.pending_changes(), 2);
        assert_eq!(manager.current().len(), 2);

        manager.rebuild(&store, &embedder)?;
        assert!(!manager.is_stale());
        assert_eq!(manager.current().len(), 3);
        Ok(())
    }

    #[test]
    fn test_concurrent_rebuilds_coalesce() {
        let manager = IndexManager::new(2);
        let store = store();
        let embedder = embedder().with_delay(Duration::from_millis(150));
        let barrier = Barrier::new(2);
        let (manager, store, embedder, barrier) = (&manager, &store, &embedder, &barrier);

        let outcomes: Vec<RebuildOutcome> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..2)
                .map(|_| {
                    s.spawn(move || {
                        barrier.wait();
                        manager.rebuild(store, embedder).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let published = outcomes
            .iter()
            .filter(|o| matches!(o, RebuildOutcome::Published { .. }))
            .count();
        let coalesced = outcomes
            .iter()
            .filter(|o| matches!(o, RebuildOutcome::Coalesced { .. }))
            .count();
        assert_eq!((published, coalesced), (1, 1));
        assert_eq!(manager.current().id(), 1);
    }
}
