//! List indicators command.

use anyhow::{Context, Result};
use stockscope_config::AppConfig;
use stockscope_signals::{catalog, Analyzer};

pub async fn run(config: &AppConfig) -> Result<()> {
    let analyzer =
        Analyzer::new(config.analysis.clone()).context("Invalid analysis parameters")?;
    let entries = catalog(&analyzer);

    println!("Indicators");
    println!("═══════════════════════════════════════════════════════════");

    let mut current_group = "";
    for entry in &entries {
        if entry.group != current_group {
            current_group = entry.group;
            println!();
            println!("  {}", current_group.to_uppercase().replace('_', " "));
            println!("  ───────────────────────────────────────────────────────");
        }
        println!("  {:<38} {}", entry.name, entry.description);
    }

    println!();
    println!("{} indicators. Periods come from the [analysis] config section.", entries.len());

    Ok(())
}
