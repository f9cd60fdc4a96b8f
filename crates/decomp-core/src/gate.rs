//! Confidence gate.
//!
//! Decides whether a match is trusted enough to resolve to its intent's
//! subtasks. The catalog that was indexed and the subtask table are allowed
//! to disagree, so an accepted intent must also exist in the table.

use serde::Serialize;
use tracing::warn;

use crate::catalog::SubtaskTable;
use crate::matcher::MatchResult;

/// Why a request took the fallback path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The matcher found no candidate
    NoMatch,
    /// The best candidate scored under the threshold
    BelowThreshold,
    /// The intent is not in the subtask table
    UnknownIntent,
}

/// Outcome of gating a match
#[derive(Debug, PartialEq)]
pub enum Route<'a> {
    /// Resolve subtasks from this intent's variants
    Intent {
        intent: &'a str,
        variants: &'a [Vec<String>],
    },
    /// Use the generic fallback
    Fallback(FallbackReason),
}

/// Threshold check plus subtask-table presence check
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceGate {
    threshold: f32,
}

impl ConfidenceGate {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn route<'a>(&self, result: &'a MatchResult, table: &'a SubtaskTable) -> Route<'a> {
        let Some(intent) = result.intent.as_deref() else {
            return Route::Fallback(FallbackReason::NoMatch);
        };

        if result.confidence < self.threshold {
            return Route::Fallback(FallbackReason::BelowThreshold);
        }

        match table.variants(intent) {
            Some(variants) => Route::Intent { intent, variants },
            None => {
                warn!(intent, "Matched intent has no subtask templates, using fallback");
                Route::Fallback(FallbackReason::UnknownIntent)
            }
        }
    }
}
