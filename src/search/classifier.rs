//! Sentiment gateway and a keyword-lexicon fallback classifier

use std::collections::HashMap;

use lazy_static::lazy_static;

use super::embedding::tokenize;
use crate::core::sentiment::Sentiment;
use crate::error::EngineResult;

/// Text to one label of the closed sentiment set
pub trait SentimentGateway: Send + Sync {
    fn classify(&self, text: &str) -> EngineResult<Sentiment>;
}

lazy_static! {
    static ref LEXICON: HashMap<&'static str, Sentiment> = {
        let groups: [(Sentiment, &[&str]); 6] = [
            (Sentiment::Joy, &[
                "happy", "joy", "amazing", "wonderful", "grateful", "loved", "love", "laughed",
                "promoted", "great", "excited", "proud", "glad", "fun", "nine",
            ]),
            (Sentiment::Sadness, &[
                "sad", "down", "miss", "lonely", "cry", "cried", "broke", "lost", "grief",
                "unhappy", "depressed", "tired",
            ]),
            (Sentiment::Anger, &[
                "angry", "furious", "terrible", "annoyed", "ugh", "hate", "mad", "frustrated",
                "crashed", "stuck", "rage",
            ]),
            (Sentiment::Fear, &[
                "afraid", "scared", "terrified", "anxious", "worried", "nervous", "uneasy",
                "racing", "panic", "fear",
            ]),
            (Sentiment::Surprise, &[
                "surprise", "surprised", "shocked", "unexpected", "idea", "wow", "suddenly",
            ]),
            (Sentiment::Disgust, &[
                "gross", "disgusting", "disgusted", "nasty", "revolting", "appetite", "yuck",
            ]),
        ];

        let mut lexicon = HashMap::new();
        for (sentiment, words) in groups {
            for word in words {
                lexicon.insert(*word, sentiment);
            }
        }
        lexicon
    };
}

/// Counts lexicon hits per label; no hits or a tie for first place is neutral
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentGateway for LexiconClassifier {
    fn classify(&self, text: &str) -> EngineResult<Sentiment> {
        let mut counts: HashMap<Sentiment, usize> = HashMap::new();
        for token in tokenize(text) {
            if let Some(sentiment) = LEXICON.get(token.as_str()) {
                *counts.entry(*sentiment).or_insert(0) += 1;
            }
        }

        let best = counts.values().copied().max().unwrap_or(0);
        let mut leaders = counts.iter().filter(|&(_, &n)| n == best);
        match (leaders.next(), leaders.next()) {
            (Some((sentiment, _)), None) => Ok(*sentiment),
            _ => Ok(Sentiment::Neutral),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_seed_style_text() {
        let classifier = LexiconClassifier::new();
        assert_eq!(
            classifier.classify("Got promoted! I'm on cloud nine.").unwrap(),
            Sentiment::Joy
        );
        assert_eq!(
            classifier.classify("Traffic was terrible. So furious!").unwrap(),
            Sentiment::Anger
        );
        assert_eq!(
            classifier.classify("Found a hair in my food. So gross.").unwrap(),
            Sentiment::Disgust
        );
    }

    #[test]
    fn test_no_hits_is_neutral() {
        let classifier = LexiconClassifier::new();
        assert_eq!(classifier.classify("went to the gym").unwrap(), Sentiment::Neutral);
        assert_eq!(classifier.classify("").unwrap(), Sentiment::Neutral);
    }

    #[test]
    fn test_tie_is_neutral() {
        let classifier = LexiconClassifier::new();
        assert_eq!(classifier.classify("happy but scared").unwrap(), Sentiment::Neutral);
    }
}
