use crate::types::{InputFormat, LogLevel, OutputMode};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "CHATWEAVE_CONFIG";

/// Where the config file is expected, by priority:
/// 1. Explicit `--config` path
/// 2. CHATWEAVE_CONFIG environment variable
/// 3. `<user config dir>/chatweave/config.toml`
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(env_path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|dir| dir.join("chatweave").join("config.toml"))
}

/// Defaults for flags the user did not pass
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub default_format: Option<InputFormat>,
    pub output: Option<OutputMode>,
    pub pretty: Option<bool>,
    pub log_level: Option<LogLevel>,
}

impl Config {
    /// Load the config for this invocation.
    ///
    /// A missing file means defaults, except when it was named with
    /// `--config`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit
            && !path.exists()
        {
            bail!("Config file not found: {}", path.display());
        }

        match resolve_config_path(explicit) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    pub fn format(&self, flag: Option<InputFormat>) -> InputFormat {
        flag.or(self.default_format).unwrap_or(InputFormat::Auto)
    }

    pub fn output(&self, flag: Option<OutputMode>) -> OutputMode {
        flag.or(self.output).unwrap_or(OutputMode::Json)
    }

    pub fn pretty(&self, flag: bool) -> bool {
        flag || self.pretty.unwrap_or(false)
    }
}
