//! Catalog validation.

use anyhow::{Context, Result};
use colored::Colorize;
use decomp_core::{Catalog, EngineConfig, SubtaskTable};
use std::path::Path;

/// Outcome of checking a catalog against its templates
#[derive(Debug)]
pub struct CheckReport {
    pub shape: &'static str,
    pub intents: usize,
    pub examples: usize,
    pub templates: usize,
    pub missing_templates: Vec<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.missing_templates.is_empty()
    }
}

pub fn execute(catalog: Option<&Path>, config: &EngineConfig) -> Result<()> {
    let path = catalog.unwrap_or(config.catalog_path.as_path());
    let report = check(path, config.templates_path.as_deref())?;

    println!("{} {}", "✓".green(), path.display());
    println!("  Schema:     {}", report.shape);
    println!("  Intents:    {}", report.intents);
    println!("  Examples:   {}", report.examples);
    println!("  Templates:  {}", report.templates);

    if !report.is_clean() {
        println!(
            "{} {} intent(s) have no templates and will use the fallback:",
            "!".yellow(),
            report.missing_templates.len()
        );
        for intent in &report.missing_templates {
            println!("    - {}", intent);
        }
    }
    Ok(())
}

/// Load the catalog (and templates, if given) and summarize them
pub fn check(catalog: &Path, templates: Option<&Path>) -> Result<CheckReport> {
    let loaded = Catalog::load(catalog)
        .with_context(|| format!("invalid catalog {}", catalog.display()))?;
    let table = match templates {
        Some(path) => SubtaskTable::load(path)
            .with_context(|| format!("invalid templates {}", path.display()))?,
        None => SubtaskTable::from_catalog(&loaded),
    };

    Ok(CheckReport {
        shape: loaded.shape().as_str(),
        intents: loaded.len(),
        examples: loaded.example_count(),
        templates: table.len(),
        missing_templates: table.missing_from(&loaded),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"intent": "authentication", "examples": ["login", "sign in"], "subtasks": ["Implement login API"]},
        {"intent": "frontend", "examples": ["ui"], "subtasks": ["Design UI layout"]}
    ]"#;

    #[test]
    fn test_check_clean_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, CATALOG).unwrap();

        let report = check(&path, None).unwrap();
        assert_eq!(report.shape, "object_list");
        assert_eq!(report.intents, 2);
        assert_eq!(report.examples, 3);
        assert!(report.is_clean());
    }

    #[test]
    fn test_check_reports_missing_templates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let templates = dir.path().join("templates.json");
        std::fs::write(&path, CATALOG).unwrap();
        std::fs::write(&templates, r#"{"frontend": ["Design UI layout"]}"#).unwrap();

        let report = check(&path, Some(&templates)).unwrap();
        assert_eq!(report.templates, 1);
        assert_eq!(report.missing_templates, vec!["authentication".to_string()]);
    }

    #[test]
    fn test_check_rejects_malformed_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"[{"intent": "x", "examples": ["a"], "subtasks": []}]"#).unwrap();

        assert!(check(&path, None).is_err());
    }
}
