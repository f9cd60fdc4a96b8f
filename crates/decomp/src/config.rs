//! Configuration management for decomp.
//!
//! Engine settings are loaded from multiple sources with precedence:
//! 1. Command-line flags
//! 2. Environment variables (DECOMP_*)
//! 3. Config file (`[engine]` table of ~/.decomp/config.toml)
//! 4. Default values

use anyhow::{Context, Result};
use decomp_core::{EngineConfig, MatcherKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::EngineArgs;

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    engine: Option<EngineConfig>,
}

/// Base directory for decomp data (`~/.decomp`)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".decomp")
}

/// Resolve the engine configuration for this invocation
pub fn load(args: &EngineArgs) -> Result<EngineConfig> {
    let explicit = args.config.is_some();
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| data_dir().join("config.toml"));

    load_with(&path, explicit, args, |key| std::env::var(key).ok())
}

/// Resolve with an explicit config path and variable lookup.
///
/// A missing file is an error only when the path was given explicitly.
pub fn load_with(
    path: &Path,
    explicit: bool,
    args: &EngineArgs,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<EngineConfig> {
    let base = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(data_dir);

    let mut config = if path.exists() {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file: FileConfig = toml::from_str(&source)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        let mut engine = file
            .engine
            .unwrap_or_else(|| EngineConfig::new("catalog.json"));
        resolve_relative(&mut engine, &base);
        engine
    } else if explicit {
        anyhow::bail!("config file not found: {}", path.display());
    } else {
        EngineConfig::new(base.join("catalog.json"))
    };

    config.apply_overrides(lookup)?;

    if let Some(catalog) = &args.catalog {
        config.catalog_path = catalog.clone();
    }
    if let Some(templates) = &args.templates {
        config.templates_path = Some(templates.clone());
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if args.keyword {
        config.matcher = MatcherKind::Keyword;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    config.validate()?;
    debug!(
        catalog = %config.catalog_path.display(),
        templates = ?config.templates_path,
        threshold = config.threshold,
        matcher = config.matcher.as_str(),
        seed = ?config.seed,
        "Engine config resolved"
    );
    Ok(config)
}

/// Paths in the config file are relative to the file
fn resolve_relative(config: &mut EngineConfig, base: &Path) {
    if config.catalog_path.is_relative() {
        config.catalog_path = base.join(&config.catalog_path);
    }
    if let Some(templates) = &config.templates_path {
        if templates.is_relative() {
            config.templates_path = Some(base.join(templates));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = load_with(&path, false, &EngineArgs::default(), no_env).unwrap();
        assert_eq!(config.catalog_path, dir.path().join("catalog.json"));
        assert_eq!(config.matcher, MatcherKind::Embedding);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(load_with(&path, true, &EngineArgs::default(), no_env).is_err());
    }

    #[test]
    fn test_file_paths_are_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[engine]\ncatalog_path = \"intents.json\"\ntemplates_path = \"tpl.json\"\nthreshold = 0.3\n",
        )
        .unwrap();

        let config = load_with(&path, true, &EngineArgs::default(), no_env).unwrap();
        assert_eq!(config.catalog_path, dir.path().join("intents.json"));
        assert_eq!(config.templates_path, Some(dir.path().join("tpl.json")));
        assert_eq!(config.threshold, 0.3);
    }

    #[test]
    fn test_flags_override_env_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[engine]\nthreshold = 0.3\n").unwrap();

        let args = EngineArgs {
            catalog: Some(PathBuf::from("/data/catalog.json")),
            threshold: Some(0.7),
            keyword: true,
            seed: Some(42),
            ..Default::default()
        };
        let env = |key: &str| match key {
            "DECOMP_THRESHOLD" => Some("0.5".to_string()),
            "DECOMP_SEED" => Some("1".to_string()),
            _ => None,
        };

        let config = load_with(&path, true, &args, env).unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("/data/catalog.json"));
        assert_eq!(config.threshold, 0.7);
        assert_eq!(config.matcher, MatcherKind::Keyword);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_invalid_threshold_flag_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = EngineArgs {
            threshold: Some(1.5),
            ..Default::default()
        };
        assert!(load_with(&dir.path().join("config.toml"), false, &args, no_env).is_err());
    }
}
