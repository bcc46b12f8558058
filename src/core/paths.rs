use std::path::PathBuf;

/// Well-known locations under a journal root
pub struct KairoPaths {
    pub root: PathBuf,
    pub config: PathBuf,
    pub database: PathBuf,
}

impl KairoPaths {
    /// Paths rooted at the current directory
    pub fn current() -> Self {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_root(root)
    }

    pub fn from_root(root: PathBuf) -> Self {
        let data_dir = root.join(".kairo");
        Self {
            config: data_dir.join("config.yaml"),
            database: data_dir.join("journal.db"),
            root,
        }
    }
}
