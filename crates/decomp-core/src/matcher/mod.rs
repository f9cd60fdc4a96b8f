//! Intent matchers.
//!
//! A matcher scores a free-text description against the catalog and returns
//! the single best intent with a confidence in `[0, 1]`. It does not decide
//! whether that confidence is good enough; see [`crate::gate`].

mod embedding;
mod keyword;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

pub use embedding::EmbeddingMatcher;
pub use keyword::KeywordMatcher;

/// Best candidate for a description
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    /// Matched intent; `None` when nothing in the catalog matched at all
    pub intent: Option<String>,
    /// Match confidence in `[0, 1]`
    pub confidence: f32,
    /// Position of the winning example in catalog example order
    pub matched_example_index: Option<usize>,
}

impl MatchResult {
    /// Nothing matched
    pub fn no_match() -> Self {
        Self {
            intent: None,
            confidence: 0.0,
            matched_example_index: None,
        }
    }

    /// A candidate intent with its score
    pub fn matched(intent: impl Into<String>, confidence: f32, example_index: usize) -> Self {
        Self {
            intent: Some(intent.into()),
            confidence,
            matched_example_index: Some(example_index),
        }
    }

    pub fn is_match(&self) -> bool {
        self.intent.is_some()
    }
}

/// Scores a description against the catalog.
///
/// Implementations must be deterministic for a fixed catalog and input, and
/// resolve ties in favour of the earliest catalog entry.
#[async_trait]
pub trait IntentMatcher: Send + Sync {
    /// Short name for logs and health output
    fn name(&self) -> &'static str;

    /// Embedding model backing this matcher, if any
    fn model_id(&self) -> Option<&str> {
        None
    }

    /// Number of catalog intents the matcher can report
    fn intent_count(&self) -> usize;

    /// Number of catalog examples the matcher scores against
    fn example_count(&self) -> usize;

    /// Find the best intent for a description
    async fn best_match(&self, description: &str) -> Result<MatchResult>;
}
