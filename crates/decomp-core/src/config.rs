//! Engine configuration.
//!
//! Loaded from TOML (usually the `[engine]` table of a host's config file),
//! then overridden by `DECOMP_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default minimum confidence for accepting a match
pub const DEFAULT_THRESHOLD: f32 = 0.45;

/// Default bucket count for the hashing embedder
pub const DEFAULT_HASHING_DIMENSIONS: usize = 512;

/// Which matcher implementation scores descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    /// Cosine similarity against embedded catalog examples
    Embedding,
    /// Case-insensitive substring match on catalog examples
    Keyword,
}

/// Which embedding backend the embedding matcher uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedderKind {
    #[serde(rename = "fastembed")]
    FastEmbed,
    Hashing,
}

impl FromStr for MatcherKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "embedding" => Ok(Self::Embedding),
            "keyword" => Ok(Self::Keyword),
            other => Err(Error::config(
                "matcher",
                format!("unknown matcher {:?} (expected embedding or keyword)", other),
            )),
        }
    }
}

impl FromStr for EmbedderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fastembed" => Ok(Self::FastEmbed),
            "hashing" => Ok(Self::Hashing),
            other => Err(Error::config(
                "embedder",
                format!("unknown embedder {:?} (expected fastembed or hashing)", other),
            )),
        }
    }
}

impl MatcherKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Embedding => "embedding",
            Self::Keyword => "keyword",
        }
    }
}

/// Engine configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Catalog file (JSON, object list or keyword map)
    pub catalog_path: PathBuf,

    /// Separate subtask templates file; derived from the catalog when unset
    pub templates_path: Option<PathBuf>,

    /// Minimum confidence to accept a match (default: 0.45)
    pub threshold: f32,

    /// Matcher implementation (default: embedding)
    pub matcher: MatcherKind,

    /// Embedding backend (default: fastembed when compiled in)
    pub embedder: EmbedderKind,

    /// Vector size for the hashing embedder (default: 512)
    pub hashing_dimensions: usize,

    /// Maximum matcher invocations running at once; the rest queue
    pub max_concurrent_matches: usize,

    /// Seed for reproducible variant selection
    pub seed: Option<u64>,

    /// Replacement for the built-in generic fallback
    pub fallback_subtasks: Option<Vec<String>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("catalog.json"),
            templates_path: None,
            threshold: DEFAULT_THRESHOLD,
            matcher: MatcherKind::Embedding,
            embedder: if cfg!(feature = "embeddings") {
                EmbedderKind::FastEmbed
            } else {
                EmbedderKind::Hashing
            },
            hashing_dimensions: DEFAULT_HASHING_DIMENSIONS,
            max_concurrent_matches: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            seed: None,
            fallback_subtasks: None,
        }
    }
}

impl EngineConfig {
    /// Create a config for the given catalog with defaults elsewhere
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            ..Default::default()
        }
    }

    /// Set the templates file
    pub fn with_templates(mut self, templates_path: impl Into<PathBuf>) -> Self {
        self.templates_path = Some(templates_path.into());
        self
    }

    /// Set the confidence threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the matcher implementation
    pub fn with_matcher(mut self, matcher: MatcherKind) -> Self {
        self.matcher = matcher;
        self
    }

    /// Set the embedding backend
    pub fn with_embedder(mut self, embedder: EmbedderKind) -> Self {
        self.embedder = embedder;
        self
    }

    /// Seed the variant selector
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| Error::config("toml", e.to_string()))
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Recognized keys: `DECOMP_CATALOG`, `DECOMP_TEMPLATES`,
    /// `DECOMP_THRESHOLD`, `DECOMP_MATCHER`, `DECOMP_EMBEDDER`, `DECOMP_SEED`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(path) = lookup("DECOMP_CATALOG") {
            self.catalog_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("DECOMP_TEMPLATES") {
            self.templates_path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup("DECOMP_THRESHOLD") {
            self.threshold = value
                .trim()
                .parse()
                .map_err(|_| Error::config("threshold", format!("not a number: {:?}", value)))?;
        }
        if let Some(value) = lookup("DECOMP_MATCHER") {
            self.matcher = value.parse()?;
        }
        if let Some(value) = lookup("DECOMP_EMBEDDER") {
            self.embedder = value.parse()?;
        }
        if let Some(value) = lookup("DECOMP_SEED") {
            self.seed = Some(
                value
                    .trim()
                    .parse()
                    .map_err(|_| Error::config("seed", format!("not an integer: {:?}", value)))?,
            );
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::config("threshold", "must be between 0 and 1"));
        }

        if self.max_concurrent_matches == 0 {
            return Err(Error::config(
                "max_concurrent_matches",
                "must be greater than 0",
            ));
        }

        if self.embedder == EmbedderKind::Hashing && self.hashing_dimensions == 0 {
            return Err(Error::config("hashing_dimensions", "must be greater than 0"));
        }

        if let Some(fallback) = &self.fallback_subtasks {
            if fallback.is_empty() || fallback.iter().any(|s| s.trim().is_empty()) {
                return Err(Error::config(
                    "fallback_subtasks",
                    "must be a non-empty list of non-empty subtasks",
                ));
            }
        }

        Ok(())
    }
}
