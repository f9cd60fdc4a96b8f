//! Intent → subtask variants lookup.
//!
//! Usually derived from the catalog itself. Deployments that keep their
//! templates in a separate file (`{intent: [[...], ...]}`) load it here, and
//! that table may then disagree with the catalog used for matching.

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use super::schema::{self, RawSubtasks};
use super::Catalog;
use crate::error::{Error, Result};

/// Subtask templates keyed by intent
#[derive(Debug, Clone, Default)]
pub struct SubtaskTable {
    variants: HashMap<String, Vec<Vec<String>>>,
}

impl SubtaskTable {
    /// Derive the table from the catalog's own subtask variants
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let variants = catalog
            .entries()
            .iter()
            .map(|e| (e.intent.clone(), e.subtask_variants.clone()))
            .collect();
        Self { variants }
    }

    /// Parse a standalone templates document
    pub fn from_json_str(source: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(source)
            .map_err(|e| Error::catalog(format!("invalid templates JSON: {}", e)))?;

        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::catalog(format!(
                    "templates must be an object keyed by intent, found {}",
                    schema::json_kind(&other)
                )));
            }
        };

        let mut variants = HashMap::with_capacity(map.len());
        for (intent, value) in map {
            if intent.trim().is_empty() {
                return Err(Error::catalog("templates: intent is empty"));
            }
            let raw: RawSubtasks = serde_json::from_value(value)
                .map_err(|e| Error::catalog(format!("templates {:?}: {}", intent, e)))?;
            let list = raw.into_variants();
            schema::validate_variants(&intent, &list)?;
            variants.insert(intent, list);
        }

        Ok(Self { variants })
    }

    /// Load a templates file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            Error::catalog(format!("failed to read {}: {}", path.display(), e))
        })?;
        let table = Self::from_json_str(&source)?;
        info!(path = %path.display(), intents = table.len(), "Subtask templates loaded");
        Ok(table)
    }

    /// Variants for an intent, if the table knows it
    pub fn variants(&self, intent: &str) -> Option<&[Vec<String>]> {
        self.variants.get(intent).map(Vec::as_slice)
    }

    pub fn contains(&self, intent: &str) -> bool {
        self.variants.contains_key(intent)
    }

    /// Intents of `catalog` that this table cannot resolve
    pub fn missing_from(&self, catalog: &Catalog) -> Vec<String> {
        catalog
            .entries()
            .iter()
            .filter(|e| !self.contains(&e.intent))
            .map(|e| e.intent.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
