//! Subtask engine - the service context.
//!
//! Everything a request needs is constructed once by
//! [`SubtaskEngine::bootstrap`] and then only read. Hosts wrap the engine in
//! an `Arc` and hand it to every request handler.
//!
//! Per request: embed/score (matcher) → gate → select. Matcher calls carry
//! the CPU-heavy embedding step and are bounded by a semaphore; excess
//! requests wait for a permit.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, SubtaskTable};
use crate::config::{EngineConfig, MatcherKind, DEFAULT_THRESHOLD};
use crate::embedder;
use crate::error::{Error, Result};
use crate::gate::{ConfidenceGate, Route};
use crate::matcher::{EmbeddingMatcher, IntentMatcher, KeywordMatcher};
use crate::selector::{RandomSource, SeededRandom, SubtaskPlan, SubtaskSelector, ThreadRandom};

/// Static facts about a running engine
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineInfo {
    pub matcher: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    pub intents: usize,
    pub templates: usize,
    pub indexed_examples: usize,
    pub threshold: f32,
    pub max_concurrent_matches: usize,
}

/// Immutable intent-matching and subtask-selection service
pub struct SubtaskEngine {
    matcher: Arc<dyn IntentMatcher>,
    table: SubtaskTable,
    gate: ConfidenceGate,
    selector: SubtaskSelector,
    permits: Semaphore,
    max_concurrent_matches: usize,
}

impl SubtaskEngine {
    /// Start building an engine around a matcher and a subtask table
    pub fn builder(matcher: Arc<dyn IntentMatcher>, table: SubtaskTable) -> EngineBuilder {
        EngineBuilder::new(matcher, table)
    }

    /// Load the catalog, construct the embedder and build the index.
    ///
    /// Any failure here is fatal for the host; no engine is produced from a
    /// broken catalog.
    pub async fn bootstrap(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let start = std::time::Instant::now();

        let catalog = Catalog::load(&config.catalog_path)?;
        let table = match &config.templates_path {
            Some(path) => SubtaskTable::load(path)?,
            None => SubtaskTable::from_catalog(&catalog),
        };

        let missing = table.missing_from(&catalog);
        if !missing.is_empty() {
            warn!(
                intents = ?missing,
                "Catalog intents without subtask templates will use the fallback"
            );
        }

        let matcher: Arc<dyn IntentMatcher> = match config.matcher {
            MatcherKind::Embedding => {
                let embedder = embedder::from_config(config)?;
                Arc::new(EmbeddingMatcher::build(&catalog, embedder).await?)
            }
            MatcherKind::Keyword => Arc::new(KeywordMatcher::new(&catalog)),
        };

        let random: Arc<dyn RandomSource> = match config.seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(ThreadRandom),
        };

        let mut builder = Self::builder(matcher, table)
            .threshold(config.threshold)
            .random(random)
            .max_concurrent_matches(config.max_concurrent_matches);
        if let Some(fallback) = &config.fallback_subtasks {
            builder = builder.fallback(fallback.clone());
        }
        let engine = builder.build();

        info!(
            matcher = engine.matcher.name(),
            intents = engine.matcher.intent_count(),
            templates = engine.table.len(),
            threshold = config.threshold,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Subtask engine ready"
        );

        Ok(engine)
    }

    /// Decompose a free-text description into subtasks.
    ///
    /// Never returns an empty subtask list. Fails only when the matcher
    /// fails (an unavailable embedding backend); low confidence and unknown
    /// intents resolve to the generic fallback.
    pub async fn generate_subtasks(&self, description: &str) -> Result<SubtaskPlan> {
        let result = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| Error::embedding("matcher pool closed"))?;
            self.matcher.best_match(description).await?
        };

        let route = self.gate.route(&result, &self.table);
        if let Route::Fallback(reason) = &route {
            debug!(
                ?reason,
                confidence = result.confidence,
                candidate = result.intent.as_deref().unwrap_or("-"),
                "Using generic subtasks"
            );
        }

        let plan = self.selector.select(&route, &result);
        debug!(
            intent = plan.intent.as_deref().unwrap_or("-"),
            confidence = plan.confidence,
            subtasks = plan.subtasks.len(),
            "Subtasks generated"
        );

        Ok(plan)
    }

    pub fn info(&self) -> EngineInfo {
        EngineInfo {
            matcher: self.matcher.name(),
            model_id: self.matcher.model_id().map(str::to_string),
            intents: self.matcher.intent_count(),
            templates: self.table.len(),
            indexed_examples: self.matcher.example_count(),
            threshold: self.gate.threshold(),
            max_concurrent_matches: self.max_concurrent_matches,
        }
    }

    pub fn fallback(&self) -> &[String] {
        self.selector.fallback()
    }
}

/// Builder for [`SubtaskEngine`]
pub struct EngineBuilder {
    matcher: Arc<dyn IntentMatcher>,
    table: SubtaskTable,
    threshold: f32,
    random: Arc<dyn RandomSource>,
    fallback: Option<Vec<String>>,
    max_concurrent_matches: usize,
}

impl EngineBuilder {
    pub fn new(matcher: Arc<dyn IntentMatcher>, table: SubtaskTable) -> Self {
        Self {
            matcher,
            table,
            threshold: DEFAULT_THRESHOLD,
            random: Arc::new(ThreadRandom),
            fallback: None,
            max_concurrent_matches: EngineConfig::default().max_concurrent_matches,
        }
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn fallback(mut self, fallback: Vec<String>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn max_concurrent_matches(mut self, permits: usize) -> Self {
        self.max_concurrent_matches = permits.max(1);
        self
    }

    pub fn build(self) -> SubtaskEngine {
        let mut selector = SubtaskSelector::new(self.random);
        if let Some(fallback) = self.fallback {
            selector = selector.with_fallback(fallback);
        }

        SubtaskEngine {
            matcher: self.matcher,
            table: self.table,
            gate: ConfidenceGate::new(self.threshold),
            selector,
            permits: Semaphore::new(self.max_concurrent_matches),
            max_concurrent_matches: self.max_concurrent_matches,
        }
    }
}
