// src/config.rs

use config::{Config, ConfigError, Environment, File, FileFormat};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

use crate::strategies::dynamic_dca::ScalingPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(alias = "API_KEY")]
    pub api_key: String,
    #[serde(alias = "SECRET_KEY")]
    pub secret_key: String,
    #[serde(default = "default_base_url", alias = "BASE_URL")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs", alias = "TIMEOUT_SECS")]
    pub timeout_secs: u64,
}

/// Where trade notifications go. Absent section = notifications off.
#[derive(Debug, Deserialize, Clone)]
pub struct NotifyConfig {
    #[serde(alias = "WEBHOOK_URL")]
    pub webhook_url: String,
    #[serde(default, alias = "TOKEN")]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs", alias = "TIMEOUT_SECS")]
    pub timeout_secs: u64,
}

/// Overrides for the dynamic DCA step function.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DynamicDcaConfig {
    pub step_size: Option<Decimal>,
    pub up_multiplier: Option<Decimal>,
    pub down_divider: Option<Decimal>,
}

impl DynamicDcaConfig {
    pub fn policy(&self) -> ScalingPolicy {
        let defaults = ScalingPolicy::default();
        ScalingPolicy {
            step_size: self.step_size.unwrap_or(defaults.step_size),
            up_multiplier: self.up_multiplier.unwrap_or(defaults.up_multiplier),
            down_divider: self.down_divider.unwrap_or(defaults.down_divider),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Also write a daily-rolled log file here.
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(alias = "API")]
    pub api: ApiConfig,
    #[serde(default, alias = "NOTIFY")]
    pub notify: Option<NotifyConfig>,
    #[serde(default)]
    pub dynamic_dca: DynamicDcaConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Loads `path` (`.conf`/`.ini` read as INI, anything else by extension),
    /// then applies `DCA__SECTION__KEY` environment overrides.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::new(path, settings_format(path)))
            .add_source(
                Environment::with_prefix("DCA")
                    .prefix_separator("__")
                    .separator("__"),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

fn settings_format(path: &str) -> FileFormat {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("conf") | Some("ini") | None => FileFormat::Ini,
        Some("json") => FileFormat::Json,
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        _ => FileFormat::Toml,
    }
}
