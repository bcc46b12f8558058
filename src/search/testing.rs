//! Fixed-output gateways for tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use super::classifier::SentimentGateway;
use super::embedding::EmbeddingGateway;
use crate::core::sentiment::Sentiment;
use crate::error::{EngineError, EngineResult};

pub struct StubEmbedder {
    dimension: usize,
    vectors: RwLock<HashMap<String, Vec<f32>>>,
    failing: Mutex<HashSet<String>>,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: RwLock::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(self, text: &str, vector: Vec<f32>) -> Self {
        self.set(text, vector);
        self
    }

    pub fn failing_on(self, text: &str) -> Self {
        self.fail_on(text);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set(&self, text: &str, vector: Vec<f32>) {
        self.vectors.write().unwrap().insert(text.to_string(), vector);
    }

    pub fn fail_on(&self, text: &str) {
        self.failing.lock().unwrap().insert(text.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }
}

impl EmbeddingGateway for StubEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    /// Unknown texts embed to the origin
    fn embed(&self, text: &str) -> EngineResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if self.failing.lock().unwrap().contains(text) {
            return Err(EngineError::EmbeddingFailure(format!("stub refused '{text}'")));
        }
        Ok(self
            .vectors
            .read()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.dimension]))
    }
}

#[derive(Default)]
pub struct StubClassifier {
    labels: HashMap<String, Sentiment>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl StubClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, sentiment: Sentiment) -> Self {
        self.labels.insert(text.to_string(), sentiment);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl SentimentGateway for StubClassifier {
    /// Unknown texts are neutral
    fn classify(&self, text: &str) -> EngineResult<Sentiment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EngineError::ClassificationFailure("stub classifier down".to_string()));
        }
        Ok(self.labels.get(text).copied().unwrap_or(Sentiment::Neutral))
    }
}
