//! Trend command implementation.

use anyhow::{Context, Result};
use stockscope_config::AppConfig;
use stockscope_signals::{trend_table, trend_to_json, TrendDetector};
use tracing::info;

use super::fetch_series;
use crate::cli::{OutputFormat, TrendArgs};

pub async fn run(args: TrendArgs, config: &AppConfig) -> Result<()> {
    let mut settings = config.trend.clone();
    if let Some(window) = args.window {
        settings.window = window;
    }
    let detector =
        TrendDetector::new(&settings, &config.analysis).context("Invalid trend settings")?;

    let series = fetch_series(&args.range, config).await?;
    let snapshots = detector.detect(&series)?;

    let events = snapshots.iter().filter(|s| s.flags.any()).count();
    info!(
        symbol = %series.symbol,
        window = snapshots.len(),
        events,
        "Trend scan complete"
    );

    match args.output {
        OutputFormat::Json => println!("{}", trend_to_json(&snapshots)?),
        OutputFormat::Text => {
            println!("Trend for {} (last {} bars)", series.symbol, snapshots.len());
            println!();
            print!("{}", trend_table(&snapshots));
        }
    }

    Ok(())
}
