//! Store configuration loading.
//!
//! Configuration may come from a YAML file; every field has a default, so
//! an empty file (or no file at all) is valid. Environment variables are
//! applied on top:
//!
//! - `VOTER_BACKEND` overrides `backend` (`memory` or `dragonfly`)
//! - `REDIS_URL` overrides `dragonfly_url`
//! - `VOTER_COMMAND_TIMEOUT_MS` overrides `command_timeout_ms`

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::StoreError;

/// Location used when no `REDIS_URL` is configured.
pub const DEFAULT_DRAGONFLY_LOCATION: &str = "0.0.0.0:6379";

/// Which physical storage backs the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Process-local map. Nothing survives a restart.
    #[default]
    Memory,
    /// `Dragonfly` (Redis-compatible) document cache.
    Dragonfly,
}

impl FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "dragonfly" | "redis" => Ok(Self::Dragonfly),
            other => Err(StoreError::Config(format!("unknown backend: {other}"))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Dragonfly => f.write_str("dragonfly"),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Backend selected at construction time.
    #[serde(default)]
    pub backend: BackendKind,

    /// `host:port` or `redis://` URL of the `Dragonfly` instance.
    #[serde(default = "default_dragonfly_url")]
    pub dragonfly_url: String,

    /// Upper bound on any single `Dragonfly` command, in milliseconds.
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,

    /// Fallback log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            dragonfly_url: default_dragonfly_url(),
            command_timeout_ms: default_command_timeout_ms(),
            log_level: default_log_level(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a YAML file and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the file cannot be read, is not
    /// valid YAML, or an override has an invalid value.
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if an override has an invalid value.
    pub fn from_env() -> Result<Self, StoreError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without consulting the environment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, StoreError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(yaml)
            .map_err(|e| StoreError::Config(format!("failed to parse config YAML: {e}")))
    }

    /// Override fields from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if an override has an invalid value.
    pub fn apply_env_overrides(&mut self) -> Result<(), StoreError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Override fields from `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if an override has an invalid value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("VOTER_BACKEND") {
            self.backend = val.parse()?;
        }
        if let Some(val) = lookup("REDIS_URL").filter(|v| !v.is_empty()) {
            self.dragonfly_url = val;
        }
        if let Some(val) = lookup("VOTER_COMMAND_TIMEOUT_MS") {
            self.command_timeout_ms = val.parse().map_err(|e| {
                StoreError::Config(format!("invalid VOTER_COMMAND_TIMEOUT_MS: {e}"))
            })?;
        }
        Ok(())
    }

    /// The per-command timeout as a [`Duration`].
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// The `Dragonfly` location as a `redis://` URL.
    ///
    /// A bare `host:port` gets the `redis://` scheme prepended.
    pub fn redis_url(&self) -> String {
        if self.dragonfly_url.contains("://") {
            self.dragonfly_url.clone()
        } else {
            format!("redis://{}", self.dragonfly_url)
        }
    }
}

fn default_dragonfly_url() -> String {
    DEFAULT_DRAGONFLY_LOCATION.to_owned()
}

const fn default_command_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_owned()
}
