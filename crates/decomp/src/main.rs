//! decomp - break task descriptions into subtasks
//!
//! Runs the subtask engine in-process; no server needed.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so `--json` output stays parseable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("decomp=warn".parse()?))
        .init();

    let cli = Cli::parse();

    // Execute command
    match cli.command {
        Commands::Generate { description, json } => {
            let config = config::load(&cli.engine)?;
            commands::generate::execute(&description.join(" "), json, &config).await
        }
        Commands::Check { catalog } => {
            let config = config::load(&cli.engine)?;
            commands::check::execute(catalog.as_deref(), &config)
        }
        Commands::Intents => commands::intents::execute(&config::load(&cli.engine)?),
        Commands::Version => {
            println!("decomp {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
