use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
    str::FromStr,
    sync::Mutex,
};

use anyhow::Context;
use chrono::Local;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

use crate::config::LoggerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn tag(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DBG",
            LogLevel::Info => "INF",
            LogLevel::Warn => "WAR",
            LogLevel::Error => "ERR",
        }
    }

    pub fn colored_tag(&self) -> ColoredString {
        match self {
            LogLevel::Debug => self.tag().bright_cyan(),
            LogLevel::Info => self.tag().bright_green(),
            LogLevel::Warn => self.tag().yellow(),
            LogLevel::Error => self.tag().bright_red(),
        }
    }

    /// Whether a message of this level passes a logger set to `threshold`.
    pub fn passes(&self, threshold: &LogLevel) -> bool {
        self >= threshold
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "warning" | "war" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "Debug"),
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Warn => write!(f, "Warn"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

/// User facing status output of the driver. Messages go to stderr, colored,
/// and optionally uncolored into a log file.
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    name: String,
    file: Option<Mutex<BufWriter<File>>>,
}

impl Logger {
    pub fn new(level: LogLevel, name: String) -> Self {
        Logger {
            level,
            name,
            file: None,
        }
    }

    pub fn with_log_file(mut self, path: &str) -> anyhow::Result<Self> {
        let file = File::create(path).with_context(|| format!("failed to create log file {path}"))?;
        self.file = Some(Mutex::new(BufWriter::new(file)));
        Ok(self)
    }

    pub fn from_config(config: &LoggerConfig, name: String) -> anyhow::Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }

        let logger = Logger::new(config.log_level, name);
        if !config.log_file {
            return Ok(Some(logger));
        }

        std::fs::create_dir_all("./logs").context("failed to create log folder")?;
        let path = format!(
            "./logs/fa_min_{}.txt",
            Local::now().format("%Y-%m-%d_%H-%M-%S")
        );

        Ok(Some(logger.with_log_file(&path)?))
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn prefix(&self, level: LogLevel) -> String {
        format!("[{}] {}", level.colored_tag(), format!("{}:", self.name).dimmed())
    }

    fn plain_prefix(&self, level: LogLevel) -> String {
        format!("[{}] {}:", level.tag(), self.name)
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        self.writeln_to_file(&format!("{} {}", self.plain_prefix(level), message));

        if level.passes(&self.level) {
            eprintln!("{} {}", self.prefix(level), message);
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    // a poisoned lock or failing write only loses log lines
    fn writeln_to_file(&self, line: &str) {
        if let Some(file) = &self.file
            && let Ok(mut f) = file.lock()
        {
            let _ = writeln!(f, "{line}");
        }
    }

    pub fn object<'a>(&'a self, name: &'a str) -> ObjectBuilder<'a> {
        ObjectBuilder::new(name, self)
    }
}

/// Logs a named record with one field per line.
#[derive(Debug, Clone)]
pub struct ObjectBuilder<'a> {
    logger: &'a Logger,
    name: &'a str,
    fields: Vec<(&'a str, String)>,
}

impl<'a> ObjectBuilder<'a> {
    fn new(name: &'a str, logger: &'a Logger) -> Self {
        ObjectBuilder {
            logger,
            name,
            fields: vec![],
        }
    }

    pub fn add_field(mut self, name: &'a str, value: impl Display) -> Self {
        self.fields.push((name, value.to_string()));

        self
    }

    fn build(&self) -> String {
        let mut result = format!("{} {{", self.name);
        for (name, value) in &self.fields {
            result.push_str(&format!("\n  {}: {}", name, value));
        }
        result.push_str("\n}");
        result
    }

    pub fn log(&self, level: LogLevel) {
        self.logger.log(level, &self.build());
    }
}

#[test]
fn test_level_threshold() {
    assert!(LogLevel::Error.passes(&LogLevel::Warn));
    assert!(LogLevel::Warn.passes(&LogLevel::Warn));
    assert!(!LogLevel::Info.passes(&LogLevel::Warn));
    assert!(LogLevel::Debug.passes(&LogLevel::Debug));
}

#[test]
fn test_object_builder() {
    let logger = Logger::new(LogLevel::Error, "test".to_string());
    let object = logger
        .object("Automaton")
        .add_field("states", 4)
        .add_field("alphabet", "a b");

    assert_eq!(object.build(), "Automaton {\n  states: 4\n  alphabet: a b\n}");
}
