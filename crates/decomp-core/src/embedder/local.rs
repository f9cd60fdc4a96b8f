//! Local `fastembed` inference.
//!
//! Uses the all-MiniLM-L6-v2 model (384 dimensions). The model is loaded on
//! first use behind a single-flight cell: concurrent first callers wait for
//! the same load, and a failed load leaves the cell empty for a later retry.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::Embedder;
use crate::error::{Error, Result};

/// Model identifier recorded in every index built by this embedder
pub const FASTEMBED_MODEL_ID: &str = "all-MiniLM-L6-v2";

/// Embedding dimensions for all-MiniLM-L6-v2
pub const FASTEMBED_DIMENSIONS: usize = 384;

/// A value loaded at most once, on the blocking thread pool.
///
/// Concurrent first callers wait for the same load. A failed load leaves the
/// cell empty so a later call retries.
#[cfg_attr(not(feature = "embeddings"), allow(dead_code))]
pub(crate) struct LazyModel<T> {
    cell: OnceCell<Arc<T>>,
}

#[cfg_attr(not(feature = "embeddings"), allow(dead_code))]
impl<T: Send + Sync + 'static> LazyModel<T> {
    pub(crate) fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the loaded value, running `load` if nothing is loaded yet
    pub(crate) async fn get_or_load<F>(&self, load: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let value = self
            .cell
            .get_or_try_init(|| async move {
                let value = tokio::task::spawn_blocking(load)
                    .await
                    .map_err(|e| Error::embedding(format!("Model loader task failed: {}", e)))??;
                Ok::<_, Error>(Arc::new(value))
            })
            .await?;

        Ok(Arc::clone(value))
    }

    pub(crate) fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

/// Embedding service backed by a local ONNX model
#[cfg(feature = "embeddings")]
pub struct FastEmbedder {
    model: LazyModel<::fastembed::TextEmbedding>,
}

#[cfg(not(feature = "embeddings"))]
pub struct FastEmbedder {
    _phantom: std::marker::PhantomData<()>,
}

impl Default for FastEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embeddings")]
impl FastEmbedder {
    pub fn new() -> Self {
        Self {
            model: LazyModel::new(),
        }
    }

    /// Initialize the embedding model (lazy loading)
    async fn model(&self) -> Result<Arc<::fastembed::TextEmbedding>> {
        self.model
            .get_or_load(|| {
                use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

                tracing::info!("Loading embedding model: {}", FASTEMBED_MODEL_ID);
                let start = std::time::Instant::now();

                let mut init_options = InitOptions::default();
                init_options.model_name = EmbeddingModel::AllMiniLML6V2;
                init_options.show_download_progress = false;
                let model = TextEmbedding::try_new(init_options).map_err(|e| {
                    Error::embedding(format!("Failed to load embedding model: {}", e))
                })?;

                tracing::info!("Embedding model loaded in {:?}", start.elapsed());
                Ok(model)
            })
            .await
    }

    /// Check if the model is loaded
    pub fn is_loaded(&self) -> bool {
        self.model.is_loaded()
    }
}

#[cfg(feature = "embeddings")]
#[async_trait]
impl Embedder for FastEmbedder {
    fn model_id(&self) -> &str {
        FASTEMBED_MODEL_ID
    }

    fn dimensions(&self) -> usize {
        FASTEMBED_DIMENSIONS
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.model().await?;
        let texts = texts.to_vec();
        let expected = texts.len();

        let embeddings = tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await
            .map_err(|e| Error::embedding(format!("Embedding task failed: {}", e)))?
            .map_err(|e| Error::embedding(format!("Failed to generate embeddings: {}", e)))?;

        if embeddings.len() != expected {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                expected,
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }
}

#[cfg(not(feature = "embeddings"))]
impl FastEmbedder {
    /// Create a new embedder (no-op without embeddings feature)
    pub fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }

    /// Check if the model is loaded
    pub fn is_loaded(&self) -> bool {
        false
    }
}

#[cfg(not(feature = "embeddings"))]
#[async_trait]
impl Embedder for FastEmbedder {
    fn model_id(&self) -> &str {
        FASTEMBED_MODEL_ID
    }

    fn dimensions(&self) -> usize {
        FASTEMBED_DIMENSIONS
    }

    /// Generate embeddings - returns error without embeddings feature
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::embedding(
            "Embeddings feature not enabled. Compile with --features embeddings",
        ))
    }
}
