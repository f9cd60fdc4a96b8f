//! Server configuration.

use anyhow::Context;
use decomp_core::EngineConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory holding config and catalog
    pub base_dir: PathBuf,
    /// Path to configuration file
    pub config_path: PathBuf,
    /// TCP listen address
    pub bind: SocketAddr,
    /// Emit JSON log lines instead of human-readable ones
    pub json_logs: bool,
    /// Engine settings
    pub engine: EngineConfig,
}

/// On-disk layout of `config.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    bind: Option<SocketAddr>,
    json_logs: Option<bool>,
    engine: Option<EngineConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_base_dir(home.join(".decomp"))
    }
}

impl Config {
    fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            config_path: base_dir.join("config.toml"),
            bind: default_bind(),
            json_logs: false,
            engine: EngineConfig::new(base_dir.join("catalog.json")),
            base_dir,
        }
    }

    /// Load configuration from file, environment and defaults
    ///
    /// Standard directory structure:
    /// ```text
    /// ~/.decomp/
    /// ├── config.toml           # bind address and [engine] table
    /// ├── catalog.json          # default catalog
    /// └── templates.json        # optional subtask templates
    /// ```
    ///
    /// `DECOMP_DIR` replaces `~/.decomp`; `DECOMP_BIND` and the engine's
    /// `DECOMP_*` variables override the file.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load with an explicit variable lookup
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let base_dir = lookup("DECOMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".decomp"));

        std::fs::create_dir_all(&base_dir)
            .with_context(|| format!("failed to create {}", base_dir.display()))?;

        let mut config = Self::with_base_dir(base_dir);

        if config.config_path.exists() {
            let source = std::fs::read_to_string(&config.config_path)?;
            let file: FileConfig = toml::from_str(&source)
                .with_context(|| format!("invalid {}", config.config_path.display()))?;

            if let Some(bind) = file.bind {
                config.bind = bind;
            }
            if let Some(json_logs) = file.json_logs {
                config.json_logs = json_logs;
            }
            if let Some(engine) = file.engine {
                config.engine = engine;
            }
        }

        config.engine.apply_overrides(&lookup)?;
        if let Some(bind) = lookup("DECOMP_BIND") {
            config.bind = bind
                .parse()
                .with_context(|| format!("invalid DECOMP_BIND {:?}", bind))?;
        }
        if let Some(format) = lookup("DECOMP_LOG_FORMAT") {
            config.json_logs = format.eq_ignore_ascii_case("json");
        }

        config.resolve_paths();
        config.engine.validate()?;
        Ok(config)
    }

    /// Relative engine paths are relative to the base directory
    fn resolve_paths(&mut self) {
        let base = self.base_dir.clone();
        let resolve = |path: &Path| -> PathBuf {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base.join(path)
            }
        };

        self.engine.catalog_path = resolve(&self.engine.catalog_path);
        if let Some(templates) = &self.engine.templates_path {
            self.engine.templates_path = Some(resolve(templates));
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}
