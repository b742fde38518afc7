//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use stockscope_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {} ({})", config.logging.level, config.logging.format);
    println!("Data directory: {}", config.data.dir.display());
    println!(
        "Retries: {} attempts, {} ms apart",
        config.data.retry_attempts, config.data.retry_delay_ms
    );
    println!("Export directory: {}", config.data.output_dir.display());
    println!("MA periods: {:?}", config.analysis.ma_periods);
    println!("Trend window: {} bars", config.trend.window);
    println!("Named symbols: {}", config.symbols.len());

    Ok(())
}
