//! Logging
//!
//! A `tracing` subscriber configured from [`LoggingConfig`]. The
//! `ROLODECK_LOG` filter and `ROLODECK_LOG_FORMAT` environment variables win
//! over whatever the config file or CLI flags say.

use crate::error::ContactError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt as tfmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const FILTER_ENV: &str = "ROLODECK_LOG";
const FORMAT_ENV: &str = "ROLODECK_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected text or json)", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        })
    }
}

/// Where log lines go. Stdout is reserved for command output by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// When false no subscriber is installed at all
    pub enabled: bool,
    /// Default directive: trace, debug, info, warn, error or off
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    /// ANSI colors for the text format
    pub color: bool,
    /// Per-target overrides, e.g. `rolodeck::latency = "debug"`
    pub modules: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "warn".to_string(),
            format: LogFormat::Text,
            output: LogOutput::Stderr,
            color: true,
            modules: BTreeMap::new(),
        }
    }
}

/// Install the global subscriber. Calling it twice is an error.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ContactError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);
    if !config.enabled {
        return Ok(());
    }

    let filter = env_filter(config)?;
    let format = effective_format(config);
    let writer = match config.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let registry = Registry::default().with(filter);
    let installed = match format {
        LogFormat::Json => registry
            .with(
                tfmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(
                tfmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(writer),
            )
            .try_init(),
    };
    installed.map_err(|e| ContactError::Config(format!("Failed to install logger: {}", e)))
}

fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, ContactError> {
    if let Ok(filter) = EnvFilter::try_from_env(FILTER_ENV) {
        return Ok(filter);
    }
    build_filter(config)
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ContactError> {
    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| ContactError::Config(format!("Invalid log level '{}': {}", config.level, e)))?;
    for (target, level) in &config.modules {
        let directive = format!("{}={}", target, level)
            .parse()
            .map_err(|e| ContactError::Config(format!("Invalid log directive for {}: {}", target, e)))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

/// An unparseable `ROLODECK_LOG_FORMAT` is ignored.
fn effective_format(config: &LoggingConfig) -> LogFormat {
    std::env::var(FORMAT_ENV)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(config.format)
}
