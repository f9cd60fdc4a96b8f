//! Substring matcher; needs no embedder.

use async_trait::async_trait;
use tracing::debug;

use super::{IntentMatcher, MatchResult};
use crate::catalog::Catalog;
use crate::error::Result;

struct KeywordEntry {
    intent: String,
    /// (flat example index, lowercased example)
    examples: Vec<(usize, String)>,
}

/// Reports the first catalog entry whose example occurs in the description.
///
/// Comparison is case-insensitive. Any hit has confidence 1.0; no hit is a
/// no-match with confidence 0.
pub struct KeywordMatcher {
    entries: Vec<KeywordEntry>,
    example_count: usize,
}

impl KeywordMatcher {
    pub fn new(catalog: &Catalog) -> Self {
        let mut next = 0;
        let entries = catalog
            .entries()
            .iter()
            .map(|entry| KeywordEntry {
                intent: entry.intent.clone(),
                examples: entry
                    .examples
                    .iter()
                    .map(|example| {
                        let indexed = (next, example.to_lowercase());
                        next += 1;
                        indexed
                    })
                    .collect(),
            })
            .collect();

        Self {
            entries,
            example_count: next,
        }
    }

    /// Match synchronously
    pub fn find(&self, description: &str) -> MatchResult {
        let haystack = description.to_lowercase();
        for entry in &self.entries {
            for (index, needle) in &entry.examples {
                if haystack.contains(needle.as_str()) {
                    return MatchResult::matched(entry.intent.clone(), 1.0, *index);
                }
            }
        }
        MatchResult::no_match()
    }
}

#[async_trait]
impl IntentMatcher for KeywordMatcher {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn intent_count(&self) -> usize {
        self.entries.len()
    }

    fn example_count(&self) -> usize {
        self.example_count
    }

    async fn best_match(&self, description: &str) -> Result<MatchResult> {
        let result = self.find(description);
        debug!(
            intent = result.intent.as_deref().unwrap_or("-"),
            "Keyword match scored"
        );
        Ok(result)
    }
}
