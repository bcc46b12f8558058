//! Embedding gateway
//!
//! The engine treats embedding as a pure, possibly slow function. Production
//! deployments plug a model behind [`EmbeddingGateway`]; the bundled
//! [`HarmonicEmbedder`] is a deterministic, training-free stand-in based on
//! Harmonic Token Projection (https://arxiv.org/html/2511.20665):
//!
//! - no neural network, no model file
//! - same input, same output
//! - Unicode code points in, so any script works

use std::f64::consts::TAU;

use crate::error::{EngineError, EngineResult};

/// Dimension of [`HarmonicEmbedder`] vectors (two components per modulus)
pub const HARMONIC_DIM: usize = 384;

/// Code points considered per token
const MAX_TOKEN_CHARS: usize = 64;

/// Text to fixed-dimension vector
pub trait EmbeddingGateway: Send + Sync {
    /// `D`, constant for the lifetime of the gateway
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> EngineResult<Vec<f32>>;

    fn embed_batch(&self, texts: &[&str]) -> EngineResult<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Harmonic Token Projection embedder
pub struct HarmonicEmbedder {
    moduli: Vec<u64>,
}

impl HarmonicEmbedder {
    pub fn new() -> Self {
        Self {
            moduli: first_primes(HARMONIC_DIM / 2),
        }
    }

    /// Each token is read as a base-2^16 integer `n` and projected onto the
    /// unit circle once per modulus: `[sin(2π·(n mod m)/m), cos(...)]`.
    fn project_token(&self, token: &str, acc: &mut [f64]) {
        let n = token
            .chars()
            .take(MAX_TOKEN_CHARS)
            .fold(0u64, |n, c| n.wrapping_mul(1 << 16).wrapping_add(c as u64));

        for (i, &m) in self.moduli.iter().enumerate() {
            let theta = TAU * (n % m) as f64 / m as f64;
            acc[2 * i] += theta.sin();
            acc[2 * i + 1] += theta.cos();
        }
    }
}

impl Default for HarmonicEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddingGateway for HarmonicEmbedder {
    fn dimension(&self) -> usize {
        HARMONIC_DIM
    }

    /// Mean of token projections, L2-normalized. Text without tokens maps to
    /// the zero vector.
    fn embed(&self, text: &str) -> EngineResult<Vec<f32>> {
        let tokens = tokenize(text);
        let mut acc = vec![0.0f64; HARMONIC_DIM];
        for token in &tokens {
            self.project_token(token, &mut acc);
        }

        // Mean pooling is a uniform scale, so normalizing the sum is equivalent
        let norm = acc.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Ok(vec![0.0; HARMONIC_DIM]);
        }
        if !norm.is_finite() {
            return Err(EngineError::EmbeddingFailure(
                "non-finite harmonic projection".to_string(),
            ));
        }

        Ok(acc.into_iter().map(|x| (x / norm) as f32).collect())
    }
}

/// Lowercased words split on whitespace and ASCII punctuation
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Pairwise coprime moduli
fn first_primes(count: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(count);
    let mut candidate = 2u64;
    while primes.len() < count {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}
