//! Engine configuration
//!
//! Read from `.kairo/config.yaml` when present; every field has a default so a
//! partial file (or none at all) is valid.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::paths::KairoPaths;

pub const DEFAULT_K_CANDIDATES: usize = 10;
pub const DEFAULT_MAX_RESULTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Journal database; relative paths resolve against the journal root
    pub db_path: Option<PathBuf>,
    /// Nearest neighbors fetched before ownership filtering
    pub k_candidates: usize,
    /// Candidates returned to the caller
    pub max_results: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            k_candidates: DEFAULT_K_CANDIDATES,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Config {
    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml).context("Invalid config YAML")?;
        Ok(config.sanitized())
    }

    /// Load the config under `paths`, falling back to defaults if the file is absent
    pub fn load(paths: &KairoPaths) -> Result<Self> {
        Self::load_from(&paths.config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Resolved database location
    pub fn database_path(&self, paths: &KairoPaths) -> PathBuf {
        match &self.db_path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => paths.root.join(p),
            None => paths.database.clone(),
        }
    }

    fn sanitized(mut self) -> Self {
        self.k_candidates = self.k_candidates.max(1);
        self.max_results = self.max_results.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() -> Result<()> {
        let config = Config::load_from(Path::new("/tmp/nonexistent/kairo/config.yaml"))?;
        assert_eq!(config, Config::default());
        assert_eq!(config.k_candidates, 10);
        assert_eq!(config.max_results, 3);
        Ok(())
    }

    #[test]
    fn test_partial_yaml() -> Result<()> {
        let config = Config::parse("k_candidates: 25\n")?;
        assert_eq!(config.k_candidates, 25);
        assert_eq!(config.max_results, DEFAULT_MAX_RESULTS);
        assert!(config.db_path.is_none());
        Ok(())
    }

    #[test]
    fn test_zero_values_clamped() -> Result<()> {
        let config = Config::parse("k_candidates: 0\nmax_results: 0\n")?;
        assert_eq!(config.k_candidates, 1);
        assert_eq!(config.max_results, 1);
        Ok(())
    }

    #[test]
    fn test_database_path_resolution() {
        let paths = KairoPaths::from_root(PathBuf::from("/journal"));

        let default = Config::default();
        assert_eq!(default.database_path(&paths), PathBuf::from("/journal/.kairo/journal.db"));

        let relative = Config {
            db_path: Some(PathBuf::from("data/j.db")),
            ..Config::default()
        };
        assert_eq!(relative.database_path(&paths), PathBuf::from("/journal/data/j.db"));

        let absolute = Config {
            db_path: Some(PathBuf::from("/var/kairo.db")),
            ..Config::default()
        };
        assert_eq!(absolute.database_path(&paths), PathBuf::from("/var/kairo.db"));
    }
}
