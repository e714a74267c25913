// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions.
//!
//! # Schema Structure
//!
//! ```text
//! EstateConfig
//! ├── api: ApiConfig
//! ├── session: SessionConfig
//! ├── navigation: NavigationConfig
//! └── logging: LoggingConfig
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use estate_core::RoleSet;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum request timeout in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Default navigation fallback target.
pub const DEFAULT_FALLBACK: &str = "/";

// =============================================================================
// Root Configuration
// =============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstateConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Session persistence settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Route guard overrides.
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EstateConfig {
    /// Validates every section.
    pub fn validate(&self) -> ConfigResult<()> {
        self.api.validate()?;
        self.session.validate()?;
        self.navigation.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

// =============================================================================
// API Configuration
// =============================================================================

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Server base URL, without the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// End the session when the server answers 401 or 403.
    #[serde(default = "default_enabled")]
    pub logout_on_auth_failure: bool,

    /// Custom User-Agent header.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_enabled() -> bool {
    true
}

impl ApiConfig {
    /// Validates the API configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::validation(
                "api.base_url",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::validation(
                "api.timeout_secs",
                format!("must be between 1 and {MAX_TIMEOUT_SECS}"),
            ));
        }
        Ok(())
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            logout_on_auth_failure: true,
            user_agent: None,
        }
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

/// Session persistence settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: SessionBackend,

    /// Session file path for the file backend.
    /// Defaults to `~/.estate/session.json`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl SessionConfig {
    /// Validates the session configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(path) = &self.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::validation("session.path", "must not be empty"));
            }
        }
        Ok(())
    }

    /// Returns the configured path or the default one.
    pub fn effective_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(default_session_path)
    }
}

/// Returns `~/.estate/session.json`, or `None` when no home directory is known.
pub fn default_session_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))?;
    Some(PathBuf::from(home).join(".estate").join("session.json"))
}

/// Session storage backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// JSON file on disk.
    #[default]
    File,
    /// In-process memory; nothing survives the process.
    Memory,
}

impl SessionBackend {
    /// Returns the backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionBackend::File => "file",
            SessionBackend::Memory => "memory",
        }
    }

    /// Parses a backend name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "file" => Some(SessionBackend::File),
            "memory" | "mem" => Some(SessionBackend::Memory),
            _ => None,
        }
    }
}

// =============================================================================
// Navigation Configuration
// =============================================================================

/// Route guard overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavigationConfig {
    /// Redirect target for denied navigation.
    #[serde(default = "default_fallback")]
    pub fallback: String,

    /// Guard overrides keyed by route pattern. An empty list makes the route
    /// public.
    #[serde(default)]
    pub guards: BTreeMap<String, RoleSet>,
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK.to_string()
}

impl NavigationConfig {
    /// Validates the navigation configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.fallback.starts_with('/') {
            return Err(ConfigError::validation(
                "navigation.fallback",
                "must be an absolute path",
            ));
        }
        for pattern in self.guards.keys() {
            if !pattern.starts_with('/') {
                return Err(ConfigError::validation(
                    format!("navigation.guards.{pattern}"),
                    "route pattern must start with '/'",
                ));
            }
        }
        Ok(())
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            fallback: default_fallback(),
            guards: BTreeMap::new(),
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Validates the logging configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    Info,
    /// Warning level.
    #[default]
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Compact single-line text.
    Compact,
    /// JSON lines.
    Json,
}

impl LogFormat {
    /// Parses a format name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "compact" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
