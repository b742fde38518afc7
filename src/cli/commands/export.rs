//! Export command implementation.

use anyhow::{Context, Result};
use chrono::Local;
use stockscope_config::AppConfig;
use stockscope_data::export_csv;

use super::fetch_series;
use crate::cli::ExportArgs;

pub async fn run(args: ExportArgs, config: &AppConfig) -> Result<()> {
    let series = fetch_series(&args.range, config).await?;
    if series.is_empty() {
        anyhow::bail!("No data for {} in the requested range", series.symbol);
    }

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.data.output_dir.clone());
    let path = export_csv(
        &series.symbol,
        series.bars(),
        &output_dir,
        Local::now().naive_local(),
    )
    .await
    .context("Export failed")?;

    println!("Exported {} bars to {}", series.len(), path.display());
    Ok(())
}
