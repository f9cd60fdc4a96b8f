//! Source schemas and their normalizers.
//!
//! Two historical catalog layouts are accepted:
//!
//! ```json
//! [{"intent": "authentication", "examples": ["login"], "subtasks": ["..."]}]
//! ```
//!
//! ```json
//! {"login": ["Design user schema", "Implement login API"]}
//! ```
//!
//! The layout is chosen from the shape of the parsed document, and each one
//! has its own normalizer producing [`CatalogEntry`] values.

use serde::Deserialize;
use serde::Serialize;
use serde_json::{Map, Value};

use super::CatalogEntry;
use crate::error::{Error, Result};

/// Which source layout a catalog was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogShape {
    /// `[{intent, examples, subtasks}, ...]`
    ObjectList,
    /// `{keyword: [subtask, ...], ...}`
    KeywordMap,
}

impl CatalogShape {
    /// Detect the layout of a parsed document
    pub fn detect(value: &Value) -> Result<Self> {
        match value {
            Value::Array(_) => Ok(Self::ObjectList),
            Value::Object(_) => Ok(Self::KeywordMap),
            other => Err(Error::catalog(format!(
                "expected a list of entries or a keyword map, found {}",
                json_kind(other)
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectList => "object_list",
            Self::KeywordMap => "keyword_map",
        }
    }
}

/// Subtasks as written in a source: one list, or a list of variants.
///
/// `Variants` is tried first so that `[]` and `[[...]]` land there.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawSubtasks {
    Variants(Vec<Vec<String>>),
    Single(Vec<String>),
}

impl RawSubtasks {
    pub(crate) fn into_variants(self) -> Vec<Vec<String>> {
        match self {
            Self::Variants(variants) => variants,
            Self::Single(list) => vec![list],
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    intent: String,
    examples: Vec<String>,
    subtasks: RawSubtasks,
}

/// Normalize a parsed document into catalog entries.
///
/// Only shape conversion happens here; content rules are enforced by
/// [`validate_entry`].
pub(crate) fn normalize(value: Value) -> Result<(CatalogShape, Vec<CatalogEntry>)> {
    let shape = CatalogShape::detect(&value)?;
    let entries = match value {
        Value::Array(items) => normalize_object_list(items)?,
        Value::Object(map) => normalize_keyword_map(map)?,
        _ => unreachable!("shape detection only accepts arrays and objects"),
    };
    Ok((shape, entries))
}

fn normalize_object_list(items: Vec<Value>) -> Result<Vec<CatalogEntry>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let raw: RawEntry = serde_json::from_value(item)
                .map_err(|e| Error::catalog(format!("entry {}: {}", i, e)))?;
            Ok(CatalogEntry {
                intent: raw.intent,
                examples: raw.examples,
                subtask_variants: raw.subtasks.into_variants(),
            })
        })
        .collect()
}

fn normalize_keyword_map(map: Map<String, Value>) -> Result<Vec<CatalogEntry>> {
    map.into_iter()
        .map(|(keyword, value)| {
            let raw: RawSubtasks = serde_json::from_value(value)
                .map_err(|e| Error::catalog(format!("keyword {:?}: {}", keyword, e)))?;
            Ok(CatalogEntry {
                examples: vec![keyword.clone()],
                intent: keyword,
                subtask_variants: raw.into_variants(),
            })
        })
        .collect()
}

/// Reject entries that would silently degrade matching.
pub(crate) fn validate_entry(position: usize, entry: &CatalogEntry) -> Result<()> {
    if entry.intent.trim().is_empty() {
        return Err(Error::catalog(format!("entry {}: intent is empty", position)));
    }
    if entry.examples.is_empty() {
        return Err(Error::catalog(format!(
            "entry {} ({}): no examples",
            position, entry.intent
        )));
    }
    if let Some(i) = entry.examples.iter().position(|e| e.trim().is_empty()) {
        return Err(Error::catalog(format!(
            "entry {} ({}): example {} is empty",
            position, entry.intent, i
        )));
    }
    validate_variants(&entry.intent, &entry.subtask_variants)
}

pub(crate) fn validate_variants(intent: &str, variants: &[Vec<String>]) -> Result<()> {
    if variants.is_empty() {
        return Err(Error::catalog(format!("{}: no subtasks", intent)));
    }
    for (i, variant) in variants.iter().enumerate() {
        if variant.is_empty() {
            return Err(Error::catalog(format!(
                "{}: subtask variant {} is empty",
                intent, i
            )));
        }
        if variant.iter().any(|s| s.trim().is_empty()) {
            return Err(Error::catalog(format!(
                "{}: subtask variant {} contains an empty subtask",
                intent, i
            )));
        }
    }
    Ok(())
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
