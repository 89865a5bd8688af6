//! # Runtime Configuration
//!
//! Process-wide knobs for the runtime, read from the environment or JSON

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{ErgoError, Result};

/// How stdout is buffered for `write`/`writef`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Buffering {
    /// Line-buffered on a terminal, fully buffered otherwise
    #[default]
    Auto,
    Line,
    Full,
}

impl std::str::FromStr for Buffering {
    type Err = ErgoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Buffering::Auto),
            "line" => Ok(Buffering::Line),
            "full" => Ok(Buffering::Full),
            other => Err(ErgoError::ValueError(format!(
                "unknown stdout buffering mode '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub stdout_buffering: Buffering,
    /// Print the "run with a debugger" hint under trap messages
    pub trap_hint: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            stdout_buffering: Buffering::Auto,
            trap_hint: true,
        }
    }
}

pub const ENV_STDOUT_BUFFER: &str = "ERGO_STDOUT_BUFFER";
pub const ENV_TRAP_HINT: &str = "ERGO_TRAP_HINT";

impl RuntimeConfig {
    /// Build a config from `ERGO_STDOUT_BUFFER` and `ERGO_TRAP_HINT`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| ErgoError::ValueError(format!("invalid runtime config: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ErgoError::RuntimeError(format!("cannot serialize config: {}", e)))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = RuntimeConfig::default();

        if let Some(mode) = lookup(ENV_STDOUT_BUFFER) {
            config.stdout_buffering = mode.parse()?;
        }

        if let Some(flag) = lookup(ENV_TRAP_HINT) {
            config.trap_hint = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(ErgoError::ValueError(format!(
                        "{} must be a boolean, got '{}'",
                        ENV_TRAP_HINT, other
                    )))
                }
            };
        }

        Ok(config)
    }
}

lazy_static::lazy_static! {
    static ref ACTIVE: RwLock<RuntimeConfig> = RwLock::new(RuntimeConfig::default());
}

/// Replace the process-wide configuration
pub fn install(config: RuntimeConfig) {
    match ACTIVE.write() {
        Ok(mut active) => *active = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Snapshot of the active configuration
pub fn active() -> RuntimeConfig {
    match ACTIVE.read() {
        Ok(active) => active.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
