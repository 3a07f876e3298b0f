use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::picker::NavigationPolicy;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub picker: PickerConfig,
    pub log:    LogConfig,
}

fn default_date_format() -> String { "%d/%m/%Y".to_owned() }
fn default_log_filter()  -> String { "info".to_owned() }

#[derive(Debug, Deserialize)]
pub struct PickerConfig {
    /// chrono format used to show and read back the selected date.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(flatten)]
    pub policy:      NavigationPolicy,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self { date_format: default_date_format(), policy: NavigationPolicy::default() }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self { Self { filter: default_log_filter() } }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            Self::from_toml(&std::fs::read_to_string(&path)?)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("daypicker")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("daypicker")
}
