use std::{fmt::Display, path::Path, str::FromStr};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::logger::LogLevel;

/// How the driver renders automata and batch results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Graphviz,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "graphviz" | "dot" => Ok(OutputFormat::Graphviz),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Graphviz => write!(f, "graphviz"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub enabled: bool,
    pub log_file: bool,
    pub log_level: LogLevel,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            enabled: true,
            log_file: false,
            log_level: LogLevel::Warn,
        }
    }
}

impl LoggerConfig {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_log_file(mut self, log_file: bool) -> Self {
        self.log_file = log_file;
        self
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }
}

/// Configuration of the `fa-min` driver. Every field is optional in the TOML
/// file and falls back to its default.
///
/// ```toml
/// batch_limit = 50
/// output = "json"
///
/// [logger]
/// log_level = "Info"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaMinConfig {
    /// Maximum number of strings classified per run.
    pub batch_limit: usize,
    /// Number of verdicts per line in text output.
    pub results_per_row: usize,
    pub output: OutputFormat,
    pub logger: LoggerConfig,
}

impl Default for FaMinConfig {
    fn default() -> Self {
        FaMinConfig {
            batch_limit: 30,
            results_per_row: 15,
            output: OutputFormat::Text,
            logger: LoggerConfig::default(),
        }
    }
}

impl FaMinConfig {
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(file_path: P) -> anyhow::Result<Self> {
        let file_path = file_path.as_ref();
        let content = std::fs::read_to_string(file_path)
            .with_context(|| format!("failed to read config {}", file_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("invalid config {}", file_path.display()))
    }

    pub fn from_optional_file<P: AsRef<Path>>(file_path: Option<P>) -> anyhow::Result<Self> {
        match file_path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit;
        self
    }

    pub fn with_results_per_row(mut self, results_per_row: usize) -> Self {
        self.results_per_row = results_per_row;
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn with_logger(mut self, logger: LoggerConfig) -> Self {
        self.logger = logger;
        self
    }
}

#[test]
fn test_partial_config() {
    let config = FaMinConfig::from_toml(
        r#"
        batch_limit = 5
        output = "json"

        [logger]
        log_level = "Debug"
        "#,
    )
    .unwrap();

    assert_eq!(config.batch_limit, 5);
    assert_eq!(config.results_per_row, 15);
    assert_eq!(config.output, OutputFormat::Json);
    assert_eq!(config.logger.log_level, LogLevel::Debug);
    assert!(config.logger.enabled);
}

#[test]
fn test_empty_config() {
    assert_eq!(FaMinConfig::from_toml("").unwrap(), FaMinConfig::default());
}
