//! Cosine-similarity matcher over a [`VectorIndex`].

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{IntentMatcher, MatchResult};
use crate::catalog::Catalog;
use crate::embedder::Embedder;
use crate::error::{Error, Result};
use crate::index::VectorIndex;
use crate::similarity::{cosine_with_norms, magnitude, to_confidence};

/// Matches descriptions by embedding them and comparing against every
/// indexed catalog example.
///
/// Owns both the index and the embedder used for queries, and refuses to
/// pair an index with an embedder of a different model.
pub struct EmbeddingMatcher {
    index: VectorIndex,
    embedder: Arc<dyn Embedder>,
}

impl EmbeddingMatcher {
    /// Pair a prebuilt index with the query embedder
    pub fn new(index: VectorIndex, embedder: Arc<dyn Embedder>) -> Result<Self> {
        if index.model_id() != embedder.model_id() {
            return Err(Error::ModelMismatch {
                index: index.model_id().to_string(),
                embedder: embedder.model_id().to_string(),
            });
        }
        Ok(Self { index, embedder })
    }

    /// Build the index for `catalog` with `embedder` and pair them
    pub async fn build(catalog: &Catalog, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let index = VectorIndex::build(catalog, embedder.as_ref()).await?;
        Self::new(index, embedder)
    }

    /// Score a query vector against the index.
    ///
    /// Only a strictly higher score replaces the current best, so equal
    /// scores keep the earliest example.
    pub fn score(&self, query: &[f32]) -> MatchResult {
        let query_norm = magnitude(query);

        let mut best: Option<(usize, f32)> = None;
        for (i, example) in self.index.examples().iter().enumerate() {
            let score = cosine_with_norms(query, query_norm, &example.vector, example.norm);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((i, score)),
            }
        }

        match best {
            Some((i, score)) if score > 0.0 => {
                let example = &self.index.examples()[i];
                MatchResult::matched(example.intent.clone(), to_confidence(score), i)
            }
            _ => MatchResult::no_match(),
        }
    }
}

#[async_trait]
impl IntentMatcher for EmbeddingMatcher {
    fn name(&self) -> &'static str {
        "embedding"
    }

    fn model_id(&self) -> Option<&str> {
        Some(self.index.model_id())
    }

    fn intent_count(&self) -> usize {
        self.index.entry_count()
    }

    fn example_count(&self) -> usize {
        self.index.len()
    }

    async fn best_match(&self, description: &str) -> Result<MatchResult> {
        let query = self.embedder.embed(description).await?;
        let result = self.score(&query);

        debug!(
            intent = result.intent.as_deref().unwrap_or("-"),
            confidence = result.confidence,
            example = ?result.matched_example_index,
            "Embedding match scored"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashingEmbedder;

    /// Maps each known word to its own axis; unknown words are ignored.
    struct VocabEmbedder {
        vocab: Vec<&'static str>,
    }

    #[async_trait]
    impl Embedder for VocabEmbedder {
        fn model_id(&self) -> &str {
            "vocab-test"
        }

        fn dimensions(&self) -> usize {
            self.vocab.len()
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|text| {
                    let mut v = vec![0.0; self.vocab.len()];
                    for word in text.to_lowercase().split_whitespace() {
                        if let Some(i) = self.vocab.iter().position(|w| *w == word) {
                            v[i] += 1.0;
                        }
                    }
                    v
                })
                .collect())
        }
    }

    fn vocab() -> Arc<dyn Embedder> {
        Arc::new(VocabEmbedder {
            vocab: vec!["login", "signup", "ui", "deploy", "implement"],
        })
    }

    async fn matcher(catalog: &str) -> EmbeddingMatcher {
        let catalog = Catalog::from_json_str(catalog).unwrap();
        EmbeddingMatcher::build(&catalog, vocab()).await.unwrap()
    }

    #[tokio::test]
    async fn test_best_match_picks_highest_score() {
        let matcher = matcher(
            r#"[
                {"intent": "frontend", "examples": ["ui"], "subtasks": ["a"]},
                {"intent": "authentication", "examples": ["signup", "login"], "subtasks": ["b"]}
            ]"#,
        )
        .await;

        let result = matcher.best_match("implement login").await.unwrap();
        assert_eq!(result.intent.as_deref(), Some("authentication"));
        assert_eq!(result.matched_example_index, Some(2));
        assert!((result.confidence - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_tie_goes_to_earlier_entry() {
        let matcher = matcher(
            r#"[
                {"intent": "first", "examples": ["deploy"], "subtasks": ["a"]},
                {"intent": "second", "examples": ["deploy"], "subtasks": ["b"]}
            ]"#,
        )
        .await;

        for _ in 0..3 {
            let result = matcher.best_match("deploy").await.unwrap();
            assert_eq!(result.intent.as_deref(), Some("first"));
            assert_eq!(result.matched_example_index, Some(0));
        }
    }

    #[tokio::test]
    async fn test_zero_query_vector_is_no_match() {
        let matcher = matcher(
            r#"[{"intent": "frontend", "examples": ["ui"], "subtasks": ["a"]}]"#,
        )
        .await;

        let result = matcher.best_match("xyz completely unrelated text").await.unwrap();
        assert_eq!(result, MatchResult::no_match());
    }

    #[tokio::test]
    async fn test_exact_example_is_full_confidence() {
        let matcher = matcher(
            r#"[{"intent": "frontend", "examples": ["ui", "deploy ui"], "subtasks": ["a"]}]"#,
        )
        .await;

        let result = matcher.best_match("deploy ui").await.unwrap();
        assert_eq!(result.matched_example_index, Some(1));
        assert!((result.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_score_wrong_dimension_is_no_match() {
        let catalog = Catalog::from_json_str(
            r#"[{"intent": "frontend", "examples": ["ui"], "subtasks": ["a"]}]"#,
        )
        .unwrap();
        let matcher =
            tokio_test::block_on(EmbeddingMatcher::build(&catalog, vocab())).unwrap();
        assert_eq!(matcher.score(&[1.0, 0.0]), MatchResult::no_match());
    }

    #[tokio::test]
    async fn test_model_mismatch_rejected() {
        let catalog = Catalog::from_json_str(
            r#"[{"intent": "frontend", "examples": ["ui"], "subtasks": ["a"]}]"#,
        )
        .unwrap();
        let index = VectorIndex::build(&catalog, &HashingEmbedder::new(32))
            .await
            .unwrap();

        let err = EmbeddingMatcher::new(index.clone(), Arc::new(HashingEmbedder::new(64)))
            .err()
            .unwrap();
        assert!(matches!(err, Error::ModelMismatch { .. }));

        assert!(EmbeddingMatcher::new(index, Arc::new(HashingEmbedder::new(32))).is_ok());
    }

    #[tokio::test]
    async fn test_reports_model_and_size() {
        let matcher = matcher(
            r#"[{"intent": "frontend", "examples": ["ui", "deploy"], "subtasks": ["a"]}]"#,
        )
        .await;
        assert_eq!(matcher.name(), "embedding");
        assert_eq!(matcher.model_id(), Some("vocab-test"));
        assert_eq!(matcher.example_count(), 2);
    }
}
