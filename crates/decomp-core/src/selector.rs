//! Subtask selection.
//!
//! Turns a gated route into the final [`SubtaskPlan`]. When an intent has
//! several subtask variants one is picked uniformly at random through an
//! injected [`RandomSource`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::gate::Route;
use crate::matcher::MatchResult;

/// Catalog-independent decomposition used when no intent is trusted
pub const GENERIC_FALLBACK: [&str; 5] = [
    "Understand the goal clearly",
    "Break the task into smaller steps",
    "Identify required resources",
    "Work on tasks step by step",
    "Review progress and improve",
];

/// Result of decomposing one description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskPlan {
    /// Resolved intent; absent on the fallback path
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub intent: Option<String>,
    /// Confidence of the best match, in `[0, 1]`
    pub confidence: f32,
    /// Ordered subtasks, never empty
    pub subtasks: Vec<String>,
}

impl SubtaskPlan {
    pub fn is_fallback(&self) -> bool {
        self.intent.is_none()
    }
}

/// Source of uniform indices for variant selection.
///
/// Called concurrently from many requests.
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..len`; `len` is at least 1
    fn pick(&self, len: usize) -> usize;
}

/// Per-thread generator; no state shared between calls
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// Seeded generator for reproducible selection
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        // Poisoning cannot leave StdRng in an invalid state
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..len)
    }
}

/// Resolves routes to subtask lists
pub struct SubtaskSelector {
    random: Arc<dyn RandomSource>,
    fallback: Vec<String>,
}

impl SubtaskSelector {
    /// Selector with the built-in generic fallback
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self {
            random,
            fallback: GENERIC_FALLBACK.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the generic fallback. Empty lists are ignored so the
    /// fallback can never be empty.
    pub fn with_fallback(mut self, fallback: Vec<String>) -> Self {
        if !fallback.is_empty() {
            self.fallback = fallback;
        }
        self
    }

    pub fn fallback(&self) -> &[String] {
        &self.fallback
    }

    pub fn select(&self, route: &Route<'_>, result: &MatchResult) -> SubtaskPlan {
        match route {
            Route::Intent { intent, variants } if !variants.is_empty() => {
                let chosen = self.random.pick(variants.len()).min(variants.len() - 1);
                SubtaskPlan {
                    intent: Some(intent.to_string()),
                    confidence: result.confidence,
                    subtasks: variants[chosen].clone(),
                }
            }
            _ => SubtaskPlan {
                intent: None,
                confidence: result.confidence,
                subtasks: self.fallback.clone(),
            },
        }
    }
}
