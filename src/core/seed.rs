//! Demo journal used by `kairo seed`

use anyhow::Result;
use chrono::{Duration, Utc};

use super::store::SqliteEntryStore;

/// (text, sentiment, days ago)
pub const DEMO_ENTRIES: &[(&str, &str, i64)] = &[
    ("I finally presented my project today and it went amazing! The team loved the new design.", "joy", 0),
    ("Had a wonderful dinner with friends. We laughed so much my sides hurt. I feel so grateful.", "joy", 1),
    ("Got promoted! All the hard work finally paid off. I'm on cloud nine.", "joy", 5),
    ("Feeling a bit down today. It's raining and I miss my family back home.", "sadness", 2),
    ("My favorite coffee mug broke this morning. It's a small thing but it made me sad.", "sadness", 6),
    ("Traffic was absolutely terrible. I was stuck for two hours and missed my appointment. So furious!", "anger", 3),
    ("My laptop crashed right before I saved my work. I lost an hour of progress. Ugh!", "anger", 7),
    ("I have a big presentation coming up and I'm terrified I'll mess it up. My heart is racing.", "fear", 4),
    ("Heard a strange noise outside last night. Couldn't sleep well. Felt very uneasy.", "fear", 8),
    ("Found a hair in my food at the cafeteria. I instantly lost my appetite. So gross.", "disgust", 9),
    ("My friends threw me a surprise birthday party! I had no idea. I was totally shocked.", "surprise", 10),
    ("Just a regular day. Went to the gym, did some grocery shopping, and read a book.", "neutral", 11),
    ("Spent the afternoon organizing my bookshelf. It feels good to be tidy.", "neutral", 12),
];

/// Replace `owner_id`'s entries with the demo journal; returns the number inserted
pub fn seed_demo_journal(store: &SqliteEntryStore, owner_id: i64) -> Result<usize> {
    let removed = store.clear_owner(owner_id)?;
    if removed > 0 {
        tracing::info!(owner_id, removed, "cleared existing entries before seeding");
    }

    let now = Utc::now();
    for (text, sentiment, days_ago) in DEMO_ENTRIES {
        store.insert_entry(owner_id, text, Some(*sentiment), now - Duration::days(*days_ago))?;
    }

    Ok(DEMO_ENTRIES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sentiment::Sentiment;
    use crate::core::store::EntryStore;

    #[test]
    fn test_demo_labels_are_valid() {
        for (_, label, _) in DEMO_ENTRIES {
            assert!(label.parse::<Sentiment>().is_ok(), "bad label {label}");
        }
    }

    #[test]
    fn test_seed_is_repeatable() -> Result<()> {
        let store = SqliteEntryStore::open_in_memory()?;
        seed_demo_journal(&store, 1)?;
        seed_demo_journal(&store, 1)?;
        store.insert_entry(2, "someone else's entry", None, Utc::now())?;

        let entries = store.list_all_entries()?;
        assert_eq!(entries.iter().filter(|e| e.owner_id == 1).count(), DEMO_ENTRIES.len());
        assert_eq!(entries.len(), DEMO_ENTRIES.len() + 1);
        Ok(())
    }
}
