//! Configuration loading and parsing

use anyhow::{Context, Result};
use big_log_parser::ScanConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Log file used when neither the config file nor the command line names one
pub const DEFAULT_LOG_FILE: &str = "app_2.log";

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    #[serde(default)]
    pub max_lines: Option<usize>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            max_lines: None,
        }
    }
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

impl AppConfig {
    /// Scanner settings derived from the input section
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::new().with_line_limit(self.input.max_lines)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
