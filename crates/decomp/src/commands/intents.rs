//! List catalog intents.

use anyhow::{Context, Result};
use colored::Colorize;
use decomp_core::{Catalog, EngineConfig};

pub fn execute(config: &EngineConfig) -> Result<()> {
    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("invalid catalog {}", config.catalog_path.display()))?;

    println!("{}", format!("{} intents", catalog.len()).bold());
    for entry in catalog.entries() {
        println!(
            "  {} {} example(s), {} variant(s)",
            format!("{:<28}", entry.intent).cyan(),
            entry.examples.len(),
            entry.subtask_variants.len()
        );
    }
    Ok(())
}
