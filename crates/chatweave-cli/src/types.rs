use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Export format of the input files
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Auto,
    Sillytavern,
    Gemini,
    Plain,
}

impl InputFormat {
    /// Registry name of the adapter, `None` for detection
    pub fn adapter_name(&self) -> Option<&'static str> {
        match self {
            InputFormat::Auto => None,
            InputFormat::Sillytavern => Some("sillytavern"),
            InputFormat::Gemini => Some("gemini"),
            InputFormat::Plain => Some("plain"),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Auto => write!(f, "auto"),
            InputFormat::Sillytavern => write!(f, "sillytavern"),
            InputFormat::Gemini => write!(f, "gemini"),
            InputFormat::Plain => write!(f, "plain"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Json,
    Timeline,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Json => write!(f, "json"),
            OutputMode::Timeline => write!(f, "timeline"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}
