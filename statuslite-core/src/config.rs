use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{StatusError, StatusResult};
use crate::metrics::DurationUnits;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatusLiteConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub host: HostConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Seconds between two memory samples.
    #[serde(default = "default_sample_interval")]
    pub interval_secs: u64,

    /// Number of samples kept in the memory history.
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,

    /// Samples averaged at each end of the history for trend analysis.
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    #[serde(default)]
    pub bold_font_path: Option<PathBuf>,

    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Account identifier shown on the dashboard and in the text report.
    #[serde(default = "default_bot_identifier")]
    pub identifier: String,

    #[serde(default = "default_bot_name")]
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn duration_units(&self) -> DurationUnits {
        match self {
            Locale::En => DurationUnits::english(),
            Locale::Zh => DurationUnits::chinese(),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = StatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "zh" => Ok(Locale::Zh),
            other => Err(StatusError::InvalidConfigValue {
                key: "display.locale".to_string(),
                message: format!("Unknown locale '{}'. Must be one of: en, zh", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub locale: Locale,
}

/// Plugins the console host reports as installed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_host_plugins")]
    pub plugins: Vec<HostPluginConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostPluginConfig {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sample_interval() -> u64 {
    60
}

fn default_history_capacity() -> usize {
    60
}

fn default_trend_window() -> usize {
    5
}

fn default_title() -> String {
    "MoFox-Bot Status".to_string()
}

fn default_bot_identifier() -> String {
    "N/A".to_string()
}

fn default_bot_name() -> String {
    "MoFox-Bot".to_string()
}

fn default_true() -> bool {
    true
}

fn default_host_plugins() -> Vec<HostPluginConfig> {
    vec![HostPluginConfig {
        name: crate::plugin::PLUGIN_NAME.to_string(),
        enabled: true,
    }]
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_sample_interval(),
            capacity: default_history_capacity(),
            trend_window: default_trend_window(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            bold_font_path: None,
            title: default_title(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            identifier: default_bot_identifier(),
            display_name: default_bot_name(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            plugins: default_host_plugins(),
        }
    }
}

impl StatusLiteConfig {
    pub fn load() -> StatusResult<Self> {
        Self::load_from_paths(get_config_paths())
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> StatusResult<Self> {
        load_dotenv_files();

        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("STATUSLITE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut statuslite_config: StatusLiteConfig = config.try_deserialize()?;

        if let Ok(level) = std::env::var("STATUSLITE_LOG_LEVEL") {
            statuslite_config.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            statuslite_config.logging.level = level;
        }

        if let Ok(id) = std::env::var("STATUSLITE_BOT_ID") {
            statuslite_config.bot.identifier = id;
        }

        statuslite_config.validate()?;

        Ok(statuslite_config)
    }

    pub fn validate(&self) -> StatusResult<()> {
        if self.sampler.interval_secs == 0 {
            return Err(StatusError::InvalidConfigValue {
                key: "sampler.interval_secs".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.sampler.capacity == 0 {
            return Err(StatusError::InvalidConfigValue {
                key: "sampler.capacity".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.sampler.trend_window == 0 || self.sampler.trend_window > self.sampler.capacity {
            return Err(StatusError::InvalidConfigValue {
                key: "sampler.trend_window".to_string(),
                message: format!(
                    "Must be between 1 and sampler.capacity ({})",
                    self.sampler.capacity
                ),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) && !level_lower.contains('=') {
            return Err(StatusError::InvalidConfigValue {
                key: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }

    pub fn sample_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sampler.interval_secs)
    }

    pub fn duration_units(&self) -> DurationUnits {
        self.display.locale.duration_units()
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("config").join("local.toml"));
        paths.push(cwd.join("statuslite.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("statuslite").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".statuslite").join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    let mut env_paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        env_paths.push(cwd.join(".env"));
        env_paths.push(cwd.join(".env.local"));
    }

    if let Some(home) = dirs::home_dir() {
        env_paths.push(home.join(".statuslite").join(".env"));
    }

    for path in env_paths {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("statuslite"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = StatusLiteConfig::default();

        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert_eq!(config.sampler.interval_secs, 60);
        assert_eq!(config.sampler.capacity, 60);
        assert_eq!(config.sampler.trend_window, 5);
        assert_eq!(config.bot.identifier, "N/A");
        assert_eq!(config.display.locale, Locale::En);
        assert_eq!(config.host.plugins.len(), 1);
        assert!(config.render.font_path.is_none());
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(StatusLiteConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_zero_interval() {
        let mut config = StatusLiteConfig::default();
        config.sampler.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_window_larger_than_capacity() {
        let mut config = StatusLiteConfig::default();
        config.sampler.capacity = 4;
        config.sampler.trend_window = 5;
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "E2002");
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = StatusLiteConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "statuslite_core=debug,warn".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("ZH".parse::<Locale>().unwrap(), Locale::Zh);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statuslite.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[sampler]
interval_secs = 30
capacity = 120

[bot]
identifier = "123456789"

[display]
locale = "zh"

[[host.plugins]]
name = "weather"
enabled = false
"#
        )
        .unwrap();

        let config = StatusLiteConfig::load_from_paths(vec![path]).unwrap();
        assert_eq!(config.sampler.interval_secs, 30);
        assert_eq!(config.sampler.capacity, 120);
        assert_eq!(config.sampler.trend_window, 5);
        assert_eq!(config.display.locale, Locale::Zh);
        assert_eq!(config.host.plugins.len(), 1);
        assert_eq!(config.host.plugins[0].name, "weather");
        assert!(!config.host.plugins[0].enabled);
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let config =
            StatusLiteConfig::load_from_paths(vec![PathBuf::from("/nonexistent/statuslite.toml")])
                .unwrap();
        assert_eq!(config.sampler.capacity, 60);
    }
}
