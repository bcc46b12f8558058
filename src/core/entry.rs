use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A journal entry as seen by the retrieval engine.
///
/// The entry store owns these; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub entry_id: i64,
    pub owner_id: i64,
    pub text: String,
    pub sentiment_label: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EntryRecord {
    pub fn new(entry_id: i64, owner_id: i64, text: impl Into<String>) -> Self {
        Self {
            entry_id,
            owner_id,
            text: text.into(),
            sentiment_label: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_sentiment(mut self, label: impl Into<String>) -> Self {
        self.sentiment_label = Some(label.into());
        self
    }

    /// Entries with blank text are never embedded
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text() {
        assert!(!EntryRecord::new(1, 1, "   \n").has_text());
        assert!(EntryRecord::new(1, 1, "rainy day").has_text());
    }
}
