//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, DataSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

const ENV_PREFIX: &str = "STOCKSCOPE";

fn build(path: &Path, required: bool) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    build(path, true)
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    build(path, false)
}

impl AppConfig {
    /// Check settings that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis
            .validate()
            .map_err(|e| ConfigError::Message(format!("analysis: {}", e)))?;
        self.trend
            .validate()
            .map_err(|e| ConfigError::Message(format!("trend: {}", e)))?;

        if self.data.retry_attempts == 0 {
            return Err(ConfigError::Message(
                "data: retry_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use stockscope_monitor::LogFormat;

    fn write_config(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "stockscope-config-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("stockscope.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.analysis.rsi_period, 14);
        assert_eq!(config.trend.window, 5);
        assert_eq!(config.data.retry_attempts, 3);
        assert_eq!(config.data.quote_dir, PathBuf::from("quotes"));
        assert!(config.data.fallback_to_quotes);
        assert!(config.symbols.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let path = write_config(
            "partial",
            r#"
[logging]
level = "debug"
format = "json"

[analysis]
rsi_period = 9
ma_periods = [5, 10]

[data]
dir = "/srv/bars"

[symbols]
"600519" = "Kweichow Moutai"
"#,
        );

        let config = load_config(&path).unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.analysis.rsi_period, 9);
        assert_eq!(config.analysis.ma_periods, vec![5, 10]);
        // Unset keys keep their defaults
        assert_eq!(config.analysis.cci_period, 20);
        assert_eq!(config.data.dir, PathBuf::from("/srv/bars"));
        assert_eq!(config.data.retry_attempts, 3);
        assert_eq!(config.symbols["600519"], "Kweichow Moutai");
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/stockscope.toml");
        let config = load_config(&path).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.analysis, AppConfig::default().analysis);
        assert_eq!(config.symbols.len(), 3);
        assert_eq!(config.data, AppConfig::default().data);
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("stockscope-config-absent/none.toml");

        assert!(load_config(&path).is_err());
        let config = load_config_or_default(&path).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = AppConfig::default();
        config.trend.window = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.analysis.macd_fast = 30;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.data.retry_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default();
        let rendered = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed, config);
    }
}
