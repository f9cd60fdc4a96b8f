//! Text embedding capability.
//!
//! The engine never computes embeddings itself; it consumes an [`Embedder`].
//! Two backends ship with the crate:
//!
//! - [`FastEmbedder`] - local `fastembed` inference (all-MiniLM-L6-v2, 384
//!   dimensions), loaded lazily and exactly once
//! - [`HashingEmbedder`] - deterministic feature hashing, no model download

mod local;
mod hashing;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{EmbedderKind, EngineConfig};
use crate::error::{Error, Result};

pub use self::local::{FastEmbedder, FASTEMBED_DIMENSIONS, FASTEMBED_MODEL_ID};
pub use self::hashing::HashingEmbedder;

/// Converts text into fixed-dimension vectors.
///
/// `embed` and `embed_batch` must produce vectors in the same space, and the
/// output must be deterministic for a given input and [`model_id`].
///
/// [`model_id`]: Embedder::model_id
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Identifier of the model version producing the vectors
    fn model_id(&self) -> &str;

    /// Length of every produced vector
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding("No embedding generated"))
    }
}

/// Construct the embedder selected by configuration
pub fn from_config(config: &EngineConfig) -> Result<Arc<dyn Embedder>> {
    match config.embedder {
        EmbedderKind::Hashing => Ok(Arc::new(HashingEmbedder::new(config.hashing_dimensions))),
        EmbedderKind::FastEmbed => {
            if !cfg!(feature = "embeddings") {
                return Err(Error::config(
                    "embedder",
                    "fastembed requested but built without the `embeddings` feature",
                ));
            }
            Ok(Arc::new(FastEmbedder::new()))
        }
    }
}
