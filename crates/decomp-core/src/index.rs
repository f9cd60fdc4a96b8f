//! Precomputed example embeddings.

use tracing::info;

use crate::catalog::Catalog;
use crate::embedder::Embedder;
use crate::error::{Error, Result};
use crate::similarity::magnitude;

/// One catalog example with its embedding
#[derive(Debug, Clone)]
pub struct IndexedExample {
    /// Example phrase
    pub text: String,
    /// Intent of the owning catalog entry
    pub intent: String,
    /// Position of the owning entry in the catalog
    pub entry_index: usize,
    /// Embedding vector
    pub vector: Vec<f32>,
    /// Precomputed magnitude of `vector`
    pub norm: f32,
}

/// Embeddings for every catalog example, in catalog order.
///
/// Built once at startup and read-only afterwards. Records the model it was
/// built with so queries can be checked against it.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    model_id: String,
    dimensions: usize,
    examples: Vec<IndexedExample>,
}

impl VectorIndex {
    /// Embed every example of every entry with a single batch call
    pub async fn build(catalog: &Catalog, embedder: &dyn Embedder) -> Result<Self> {
        let start = std::time::Instant::now();

        let owners: Vec<(usize, &str, &String)> = catalog
            .entries()
            .iter()
            .enumerate()
            .flat_map(|(i, entry)| {
                entry
                    .examples
                    .iter()
                    .map(move |example| (i, entry.intent.as_str(), example))
            })
            .collect();
        let texts: Vec<String> = owners.iter().map(|(_, _, text)| (*text).clone()).collect();

        let vectors = embedder.embed_batch(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(Error::embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }

        let dimensions = embedder.dimensions();
        let mut examples = Vec::with_capacity(vectors.len());
        for ((entry_index, intent, text), vector) in owners.into_iter().zip(vectors) {
            if vector.len() != dimensions {
                return Err(Error::embedding(format!(
                    "Embedding for {:?} has {} dimensions, expected {}",
                    text,
                    vector.len(),
                    dimensions
                )));
            }
            examples.push(IndexedExample {
                text: text.clone(),
                intent: intent.to_string(),
                entry_index,
                norm: magnitude(&vector),
                vector,
            });
        }

        info!(
            model = embedder.model_id(),
            examples = examples.len(),
            dimensions,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Vector index built"
        );

        Ok(Self {
            model_id: embedder.model_id().to_string(),
            dimensions,
            examples,
        })
    }

    /// Model the index was built with
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Indexed examples in catalog order
    pub fn examples(&self) -> &[IndexedExample] {
        &self.examples
    }

    /// Number of catalog entries the examples came from
    pub fn entry_count(&self) -> usize {
        self.examples.last().map_or(0, |e| e.entry_index + 1)
    }

    pub fn get(&self, index: usize) -> Option<&IndexedExample> {
        self.examples.get(index)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
