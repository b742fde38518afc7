//! Stock analysis CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use stockscope_config::load_config_or_default;
use stockscope_monitor::{setup_logging, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken file still gets logging; validate-config reports it
    let config = load_config_or_default(&cli.config);

    // Setup logging
    let (level, format) = match &config {
        Ok(config) => (config.logging.level.clone(), config.logging.format),
        Err(_) => ("info".to_string(), LogFormat::Pretty),
    };
    let level = cli.log_level.map(|l| l.as_str().to_string()).unwrap_or(level);
    let format = if cli.json_logs { LogFormat::Json } else { format };
    setup_logging(&level, format).context("Failed to set up logging")?;

    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(&cli.config).await;
    }

    let config =
        config.with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    // Execute command
    match cli.command {
        Commands::Analyze(args) => cli::commands::analyze::run(args, &config).await,
        Commands::Trend(args) => cli::commands::trend::run(args, &config).await,
        Commands::Export(args) => cli::commands::export::run(args, &config).await,
        Commands::Quote(args) => cli::commands::quote::run(args, &config).await,
        Commands::Indicators => cli::commands::indicators::run(&config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
