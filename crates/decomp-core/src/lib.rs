//! decomp-core - Intent matching and subtask selection
//!
//! Maps a free-text task description to a predefined list of subtasks by
//! finding the closest intent in a static catalog, falling back to a generic
//! decomposition when no confident match exists.
//!
//! - **catalog**: catalog loading, normalization and validation
//! - **embedder**: text embedding backends
//! - **index**: precomputed example embeddings
//! - **matcher**: embedding and keyword matchers
//! - **gate**: confidence threshold and template presence check
//! - **selector**: variant selection and generic fallback
//! - **engine**: the service context tying it together
//!
//! # Example
//!
//! ```rust,no_run
//! use decomp_core::{EngineConfig, SubtaskEngine};
//!
//! async fn example() -> decomp_core::Result<()> {
//!     let engine = SubtaskEngine::bootstrap(&EngineConfig::new("catalog.json")).await?;
//!     let plan = engine.generate_subtasks("implement login").await?;
//!     println!("{:?}: {:?}", plan.intent, plan.subtasks);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod embedder;
pub mod engine;
pub mod error;
pub mod gate;
pub mod index;
pub mod matcher;
pub mod selector;
pub mod similarity;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogEntry, CatalogShape, SubtaskTable};
pub use config::{EmbedderKind, EngineConfig, MatcherKind};
pub use embedder::Embedder;
pub use engine::{EngineBuilder, EngineInfo, SubtaskEngine};
pub use error::{Error, Result};
pub use matcher::{IntentMatcher, MatchResult};
pub use selector::{SubtaskPlan, GENERIC_FALLBACK};
