//! Feature-hashing embedder.
//!
//! Lowercased alphanumeric tokens are hashed with SHA-256 into a fixed number
//! of buckets and counted. Texts sharing words point in similar directions,
//! which is enough for keyword-heavy catalogs and keeps tests hermetic.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::Embedder;
use crate::error::Result;

/// Deterministic bag-of-words embedder
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
    model_id: String,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        let dimensions = dimensions.max(1);
        Self {
            dimensions,
            model_id: format!("hashing-{}", dimensions),
        }
    }

    /// Embed synchronously; the work is a few hashes per token
    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimensions];
        for token in tokenize(text) {
            vector[self.bucket(&token)] += 1.0;
        }
        vector
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        (u64::from_le_bytes(bytes) % self.dimensions as u64) as usize
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    #[test]
    fn test_deterministic() {
        let a = HashingEmbedder::new(128);
        let b = HashingEmbedder::new(128);
        assert_eq!(a.vectorize("Build the login page"), b.vectorize("Build the login page"));
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let embedder = HashingEmbedder::new(128);
        assert_eq!(
            embedder.vectorize("Login, Page!"),
            embedder.vectorize("login page")
        );
    }

    #[test]
    fn test_identical_text_is_fully_similar() {
        let embedder = HashingEmbedder::new(256);
        let v = embedder.vectorize("set up continuous integration");
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(16);
        let v = embedder.vectorize("  ... ");
        assert_eq!(v.len(), 16);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_token_counts_accumulate() {
        let embedder = HashingEmbedder::new(16);
        let v = embedder.vectorize("test test test");
        assert_eq!(v.iter().sum::<f32>(), 3.0);
    }

    #[test]
    fn test_zero_dimensions_clamped() {
        let embedder = HashingEmbedder::new(0);
        assert_eq!(embedder.dimensions(), 1);
        assert_eq!(embedder.vectorize("anything").len(), 1);
    }
}
