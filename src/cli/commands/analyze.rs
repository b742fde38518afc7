//! Analyze command implementation.

use anyhow::{Context, Result};
use stockscope_config::AppConfig;
use stockscope_data::{resolve_display_name, StaticDirectory};
use stockscope_signals::Analyzer;
use tracing::info;

use super::fetch_series;
use crate::cli::{AnalyzeArgs, OutputFormat};

pub async fn run(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let analyzer =
        Analyzer::new(config.analysis.clone()).context("Invalid analysis parameters")?;

    let series = fetch_series(&args.range, config).await?;
    let directory = StaticDirectory::new(config.symbols.clone());
    let name = resolve_display_name(&directory, &args.range.symbol).await;

    let analysis = analyzer.analyze(&series, &name)?;

    // Output results
    match args.output {
        OutputFormat::Json => println!("{}", analysis.to_json()?),
        OutputFormat::Text => println!("{}", analysis.summary()),
    }

    // Save if requested
    if let Some(save_path) = &args.save {
        let json = analysis.to_json()?;
        tokio::fs::write(save_path, json)
            .await
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}
