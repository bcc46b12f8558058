use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of labels produced by the sentiment gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 7] = [
        Sentiment::Joy,
        Sentiment::Sadness,
        Sentiment::Anger,
        Sentiment::Fear,
        Sentiment::Surprise,
        Sentiment::Disgust,
        Sentiment::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Sadness => "sadness",
            Self::Anger => "anger",
            Self::Fear => "fear",
            Self::Surprise => "surprise",
            Self::Disgust => "disgust",
            Self::Neutral => "neutral",
        }
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Self::Neutral)
    }

    /// Stored labels match only when they equal the canonical lowercase name
    pub fn is_label_of(&self, label: Option<&str>) -> bool {
        label == Some(self.as_str())
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown sentiment label '{0}' (must be: joy|sadness|anger|fear|surprise|disgust|neutral)")]
pub struct UnknownSentiment(pub String);

impl FromStr for Sentiment {
    type Err = UnknownSentiment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sentiment::ALL
            .into_iter()
            .find(|sentiment| sentiment.as_str() == s)
            .ok_or(UnknownSentiment(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for sentiment in Sentiment::ALL {
            assert_eq!(sentiment.as_str().parse::<Sentiment>(), Ok(sentiment));
        }
    }

    #[test]
    fn test_rejects_unknown_label() {
        let err = "happy".parse::<Sentiment>().unwrap_err();
        assert!(err.to_string().contains("happy"));
        assert!(" joy".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_label_match_is_exact() {
        assert!(Sentiment::Joy.is_label_of(Some("joy")));
        assert!(!Sentiment::Joy.is_label_of(Some(" Joy ")));
        assert!(!Sentiment::Joy.is_label_of(Some("JOY")));
        assert!(!Sentiment::Joy.is_label_of(None));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Sentiment::Surprise).unwrap();
        assert_eq!(json, "\"surprise\"");
    }
}
