pub mod ask;
pub mod index;
pub mod seed;
pub mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use kairo_recall::{
    Config, HarmonicEmbedder, KairoPaths, LexiconClassifier, RetrievalEngine, SqliteEntryStore,
};

/// Resolved paths and config for one command invocation
pub struct Workspace {
    pub paths: KairoPaths,
    pub config: Config,
    pub db_path: PathBuf,
}

impl Workspace {
    pub fn load(db_override: Option<PathBuf>) -> Result<Self> {
        let paths = KairoPaths::current();
        let config = Config::load(&paths)?;
        let db_path = db_override.unwrap_or_else(|| config.database_path(&paths));
        Ok(Self {
            paths,
            config,
            db_path,
        })
    }

    pub fn open_store(&self) -> Result<Arc<SqliteEntryStore>> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        Ok(Arc::new(SqliteEntryStore::open(&self.db_path)?))
    }

    /// Engine over the journal database with the bundled local gateways.
    /// No generation is built yet.
    pub fn engine(&self) -> Result<RetrievalEngine> {
        let store = self.open_store()?;
        let engine = RetrievalEngine::new(
            store,
            Arc::new(HarmonicEmbedder::new()),
            Arc::new(LexiconClassifier::new()),
        )?
        .with_config(&self.config);
        Ok(engine)
    }
}

/// Char-aware truncation for terminal output
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}
