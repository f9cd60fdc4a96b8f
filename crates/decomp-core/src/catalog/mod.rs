//! Intent catalog.
//!
//! The catalog is the static set of intents, their example phrases and their
//! subtask variants. It is loaded once at startup, validated as a whole and
//! never mutated afterwards.

mod schema;
mod table;

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};

pub use schema::CatalogShape;
pub use table::SubtaskTable;

/// One intent with its similarity anchors and subtask templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Canonical intent label
    pub intent: String,
    /// Example phrases, in source order
    pub examples: Vec<String>,
    /// Alternative subtask lists for this intent
    pub subtask_variants: Vec<Vec<String>>,
}

/// Validated, immutable catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    shape: CatalogShape,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from already-normalized entries.
    ///
    /// Fails on the first invalid entry. A single bad entry aborts the whole
    /// catalog rather than being skipped.
    pub fn new(shape: CatalogShape, entries: Vec<CatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::catalog("catalog has no entries"));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            schema::validate_entry(position, entry)?;
            if !seen.insert(entry.intent.as_str()) {
                return Err(Error::catalog(format!(
                    "entry {}: duplicate intent {:?}",
                    position, entry.intent
                )));
            }
        }

        Ok(Self { shape, entries })
    }

    /// Parse and normalize a catalog from JSON text
    pub fn from_json_str(source: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(source)
            .map_err(|e| Error::catalog(format!("invalid JSON: {}", e)))?;
        let (shape, entries) = schema::normalize(value)?;
        Self::new(shape, entries)
    }

    /// Load a catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::catalog(format!("failed to read {}: {}", path.display(), e)))?;
        let catalog = Self::from_json_str(&source)?;

        info!(
            path = %path.display(),
            shape = catalog.shape.as_str(),
            entries = catalog.len(),
            examples = catalog.example_count(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Which source layout this catalog came from
    pub fn shape(&self) -> CatalogShape {
        self.shape
    }

    /// Entries in catalog order
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up an entry by intent
    pub fn get(&self, intent: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.intent == intent)
    }

    /// Total number of example phrases across all entries
    pub fn example_count(&self) -> usize {
        self.entries.iter().map(|e| e.examples.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const OBJECT_LIST: &str = r#"[
        {"intent": "authentication", "examples": ["login"], "subtasks": ["Design user schema", "Implement login API"]},
        {"intent": "frontend", "examples": ["ui"], "subtasks": ["Design UI layout", "Create components"]}
    ]"#;

    const KEYWORD_MAP: &str = r#"{
        "authentication": ["Design user schema", "Implement login API"],
        "frontend": ["Design UI layout", "Create components"]
    }"#;

    #[test]
    fn test_load_object_list() {
        let catalog = Catalog::from_json_str(OBJECT_LIST).unwrap();
        assert_eq!(catalog.shape(), CatalogShape::ObjectList);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.example_count(), 2);
        assert_eq!(catalog.entries()[0].intent, "authentication");
        assert!(catalog.get("frontend").is_some());
        assert!(catalog.get("backend").is_none());
    }

    #[test]
    fn test_both_shapes_normalize_identically() {
        let list = Catalog::from_json_str(
            r#"[
                {"intent": "authentication", "examples": ["authentication"], "subtasks": ["Design user schema", "Implement login API"]},
                {"intent": "frontend", "examples": ["frontend"], "subtasks": [["Design UI layout", "Create components"]]}
            ]"#,
        )
        .unwrap();
        let map = Catalog::from_json_str(KEYWORD_MAP).unwrap();

        assert_eq!(map.shape(), CatalogShape::KeywordMap);
        assert_eq!(list.entries(), map.entries());
    }

    #[test]
    fn test_rejects_blank_intent() {
        let err = Catalog::from_json_str(
            r#"[{"intent": "  ", "examples": ["login"], "subtasks": ["a"]}]"#,
        )
        .unwrap_err();
        assert!(err.is_catalog_load());
        assert!(err.to_string().contains("intent is empty"));
    }

    #[test]
    fn test_rejects_empty_examples() {
        let err = Catalog::from_json_str(
            r#"[{"intent": "auth", "examples": [], "subtasks": ["a"]}]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no examples"));
    }

    #[test]
    fn test_rejects_empty_subtasks() {
        let err = Catalog::from_json_str(
            r#"[{"intent": "auth", "examples": ["login"], "subtasks": []}]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no subtasks"));

        let err = Catalog::from_json_str(r#"{"": ["a"]}"#).unwrap_err();
        assert!(err.is_catalog_load());
    }

    #[test]
    fn test_one_bad_entry_aborts_whole_load() {
        let err = Catalog::from_json_str(
            r#"[
                {"intent": "good", "examples": ["fine"], "subtasks": ["a"]},
                {"intent": "bad", "examples": ["fine"], "subtasks": [["a"], []]}
            ]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("variant 1 is empty"));
    }

    #[test]
    fn test_rejects_duplicate_intent() {
        let err = Catalog::from_json_str(
            r#"[
                {"intent": "auth", "examples": ["login"], "subtasks": ["a"]},
                {"intent": "auth", "examples": ["signup"], "subtasks": ["b"]}
            ]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate intent"));
    }

    #[test]
    fn test_rejects_empty_and_invalid_documents() {
        assert!(Catalog::from_json_str("[]").unwrap_err().is_catalog_load());
        assert!(Catalog::from_json_str("{}").unwrap_err().is_catalog_load());
        assert!(Catalog::from_json_str("42").unwrap_err().is_catalog_load());
        assert!(Catalog::from_json_str("{not json").unwrap_err().is_catalog_load());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(OBJECT_LIST.as_bytes()).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(dir.path().join("missing.json")).unwrap_err();
        assert!(err.is_catalog_load());
        assert!(err.to_string().contains("missing.json"));
    }
}
