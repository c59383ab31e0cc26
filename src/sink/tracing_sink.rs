// src/sink/tracing_sink.rs
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use super::template::render_template;
use super::{LogSink, LogValue};

/// Severity used by [`TracingSink`] for every message it emits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl SinkLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkLevel::Trace => "trace",
            SinkLevel::Debug => "debug",
            SinkLevel::Info => "info",
            SinkLevel::Warn => "warn",
            SinkLevel::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            SinkLevel::Trace => tracing::Level::TRACE,
            SinkLevel::Debug => tracing::Level::DEBUG,
            SinkLevel::Info => tracing::Level::INFO,
            SinkLevel::Warn => tracing::Level::WARN,
            SinkLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for SinkLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SinkLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(SinkLevel::Trace),
            "debug" => Ok(SinkLevel::Debug),
            "info" => Ok(SinkLevel::Info),
            "warn" | "warning" => Ok(SinkLevel::Warn),
            "error" => Ok(SinkLevel::Error),
            other => Err(format!(
                "unknown level '{}' (expected trace, debug, info, warn or error)",
                other
            )),
        }
    }
}

/// Sink that renders each message and forwards it to `tracing`.
///
/// Events use the target `logwhen::sink` and carry the sink's name and the
/// raw template as structured fields, so subscribers can filter on either.
#[derive(Debug, Clone)]
pub struct TracingSink {
    level: SinkLevel,
    name: String,
}

impl TracingSink {
    pub fn new(name: &str, level: SinkLevel) -> Self {
        Self {
            level,
            name: name.to_string(),
        }
    }

    pub fn level(&self) -> SinkLevel {
        self.level
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new("logwhen", SinkLevel::Info)
    }
}

impl LogSink for TracingSink {
    fn log(&self, template: &str, values: &[LogValue]) {
        let message = render_template(template, values);
        let sink = self.name.as_str();
        // tracing needs the level at compile time
        match self.level {
            SinkLevel::Trace => {
                tracing::trace!(target: "logwhen::sink", sink, template, "{}", message)
            }
            SinkLevel::Debug => {
                tracing::debug!(target: "logwhen::sink", sink, template, "{}", message)
            }
            SinkLevel::Info => {
                tracing::info!(target: "logwhen::sink", sink, template, "{}", message)
            }
            SinkLevel::Warn => {
                tracing::warn!(target: "logwhen::sink", sink, template, "{}", message)
            }
            SinkLevel::Error => {
                tracing::error!(target: "logwhen::sink", sink, template, "{}", message)
            }
        }
    }
}
