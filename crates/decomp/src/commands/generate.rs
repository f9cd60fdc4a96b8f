//! Generate subtasks for one description.

use anyhow::{Context, Result};
use colored::Colorize;
use decomp_core::{EngineConfig, SubtaskEngine, SubtaskPlan};

pub async fn execute(description: &str, json: bool, config: &EngineConfig) -> Result<()> {
    let engine = SubtaskEngine::bootstrap(config)
        .await
        .with_context(|| format!("failed to load {}", config.catalog_path.display()))?;

    let plan = engine.generate_subtasks(description).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render(&plan));
    }
    Ok(())
}

/// Human-readable plan
pub fn render(plan: &SubtaskPlan) -> String {
    let mut out = String::new();

    match &plan.intent {
        Some(intent) => out.push_str(&format!(
            "{} {} ({:.2})\n",
            "Intent:".bold(),
            intent.green(),
            plan.confidence
        )),
        None => out.push_str(&format!(
            "{} {} ({:.2})\n",
            "Intent:".bold(),
            "none, using generic subtasks".yellow(),
            plan.confidence
        )),
    }

    out.push('\n');
    for (i, subtask) in plan.subtasks.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, subtask));
    }
    out
}
