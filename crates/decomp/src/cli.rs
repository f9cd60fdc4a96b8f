//! CLI argument definitions using clap derive macros.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Break a task description into ordered subtasks
#[derive(Parser, Debug)]
#[command(name = "decomp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Engine overrides, applied after the config file and environment
#[derive(Args, Debug, Default, Clone)]
pub struct EngineArgs {
    /// Config file (default: ~/.decomp/config.toml)
    #[arg(long, global = true, env = "DECOMP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Intent catalog (JSON)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Subtask templates keyed by intent (JSON)
    #[arg(long, global = true)]
    pub templates: Option<PathBuf>,

    /// Minimum confidence for an intent to be used
    #[arg(long, global = true)]
    pub threshold: Option<f32>,

    /// Use substring matching instead of embeddings
    #[arg(long, global = true)]
    pub keyword: bool,

    /// Seed variant selection for reproducible output
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate subtasks for a task description
    Generate {
        /// Task description (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a catalog and its templates
    Check {
        /// Catalog to check (default: the configured catalog)
        catalog: Option<PathBuf>,
    },

    /// List the intents in the configured catalog
    Intents,

    /// Show version information
    Version,
}
