// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw content
//! 2. Parse YAML/TOML/JSON into [`EstateConfig`]
//! 3. Apply `ESTATE_*` environment overrides
//! 4. Resolve a relative session path against the config file's directory
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! ESTATE_API_BASE_URL=https://estate.example.com
//! ESTATE_API_TIMEOUT_SECS=10
//! ESTATE_API_LOGOUT_ON_AUTH_FAILURE=false
//! ESTATE_SESSION_BACKEND=memory
//! ESTATE_SESSION_PATH=/var/lib/estate/session.json
//! ESTATE_NAVIGATION_FALLBACK=/login
//! ESTATE_LOG_LEVEL=debug
//! ESTATE_LOG_FORMAT=json
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{EstateConfig, LogFormat, LogLevel, SessionBackend};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "ESTATE";

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// # Examples
///
/// ```no_run
/// use estate_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("estate.yaml").unwrap();
/// println!("API: {}", config.api.base_url);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Base directory for resolving relative paths.
    base_path: Option<PathBuf>,

    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply env overrides.
    resolve_env_vars: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            base_path: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
        }
    }

    /// Sets the base path for resolving relative paths.
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Loads configuration from a file.
    ///
    /// The format is chosen by extension: `.yaml`/`.yml`, `.toml` or `.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<EstateConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let base_path = self.base_path.clone().unwrap_or_else(|| {
            path.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        });

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;
        let mut config = self.parse_content(&content, format, path)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }
        resolve_relative_paths(&mut config, &base_path);

        config.validate()?;

        debug!(
            base_url = %config.api.base_url,
            backend = config.session.backend.as_str(),
            guard_overrides = config.navigation.guards.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Loads configuration from a file, or defaults when the file is missing.
    ///
    /// Environment overrides apply in both cases.
    pub fn load_or_default(&self, path: impl AsRef<Path>) -> ConfigResult<EstateConfig> {
        let path = path.as_ref();
        if path.exists() {
            return self.load(path);
        }

        debug!(path = %path.display(), "Config file not found, using defaults");
        let mut config = EstateConfig::default();
        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }
        if let Some(base) = &self.base_path {
            resolve_relative_paths(&mut config, base);
        }
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<EstateConfig> {
        let content = if self.resolve_env_vars {
            resolve_placeholders(content, |name| env::var(name).ok())
        } else {
            content.to_string()
        };
        let mut config: EstateConfig = parse_str(&content, format)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    fn parse_content(
        &self,
        content: &str,
        format: ConfigFormat,
        path: &Path,
    ) -> ConfigResult<EstateConfig> {
        let content = if self.resolve_env_vars {
            resolve_placeholders(content, |name| env::var(name).ok())
        } else {
            content.to_string()
        };

        parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })
    }

    fn apply_env_overrides(&self, config: &mut EstateConfig) -> ConfigResult<()> {
        apply_overrides(config, &self.env_prefix, |name| env::var(name).ok())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<EstateConfig> {
    match format {
        ConfigFormat::Yaml => yaml_parse(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// YAML parsing through the `config` crate.
fn yaml_parse<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

/// Replaces `${VAR}` and `${VAR:default}` placeholders.
///
/// An unset variable without a default keeps its placeholder; an unclosed
/// `${` is copied verbatim.
pub fn resolve_placeholders(content: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' || chars.peek() != Some(&'{') {
            result.push(c);
            continue;
        }
        chars.next();

        let mut var_content = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            var_content.push(c);
        }

        if !found_close {
            result.push_str("${");
            result.push_str(&var_content);
            continue;
        }

        let (var_name, default_value) = match var_content.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (var_content.as_str(), None),
        };

        match (lookup(var_name), default_value) {
            (Some(value), _) => result.push_str(&value),
            (None, Some(default)) => result.push_str(default),
            (None, None) => {
                warn!(variable = var_name, "Environment variable not found");
                result.push_str(&format!("${{{var_name}}}"));
            }
        }
    }

    result
}

/// Applies `<prefix>_*` overrides read through `lookup`.
pub fn apply_overrides(
    config: &mut EstateConfig,
    prefix: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> ConfigResult<()> {
    let var = |suffix: &str| {
        let name = format!("{prefix}_{suffix}");
        lookup(&name).map(|value| (name, value))
    };

    if let Some((_, value)) = var("API_BASE_URL") {
        config.api.base_url = value;
    }
    if let Some((name, value)) = var("API_TIMEOUT_SECS") {
        config.api.timeout_secs = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid_env_var(name, "expected a number of seconds"))?;
    }
    if let Some((_, value)) = var("API_LOGOUT_ON_AUTH_FAILURE") {
        config.api.logout_on_auth_failure = parse_bool(&value);
    }

    if let Some((name, value)) = var("SESSION_BACKEND") {
        config.session.backend = SessionBackend::parse(&value)
            .ok_or_else(|| ConfigError::invalid_env_var(name, "expected 'file' or 'memory'"))?;
    }
    if let Some((_, value)) = var("SESSION_PATH") {
        config.session.path = Some(PathBuf::from(value));
    }

    if let Some((_, value)) = var("NAVIGATION_FALLBACK") {
        config.navigation.fallback = value;
    }

    if let Some((_, value)) = var("LOG_LEVEL") {
        match LogLevel::parse(&value) {
            Some(level) => config.logging.level = level,
            None => warn!(value = %value, "Ignoring unknown log level override"),
        }
    }
    if let Some((_, value)) = var("LOG_FORMAT") {
        match LogFormat::parse(&value) {
            Some(format) => config.logging.format = format,
            None => warn!(value = %value, "Ignoring unknown log format override"),
        }
    }

    Ok(())
}

fn resolve_relative_paths(config: &mut EstateConfig, base_path: &Path) {
    if let Some(ref mut path) = config.session.path {
        if path.is_relative() {
            *path = base_path.join(&path);
        }
    }
}

/// Parses a string to bool.
fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "enabled"
    )
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<EstateConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<EstateConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use estate_core::{Role, RoleSet};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML: &str = r#"
api:
  base_url: https://estate.example.com
  timeout_secs: 12
session:
  backend: file
  path: state/session.json
navigation:
  fallback: /login
  guards:
    /favorites: [BUYER]
logging:
  level: debug
  format: json
"#;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let config = ConfigLoader::new().with_env_vars(false).load(file.path()).unwrap();

        assert_eq!(config.api.base_url, "https://estate.example.com");
        assert_eq!(config.api.timeout_secs, 12);
        assert_eq!(config.navigation.fallback, "/login");
        assert_eq!(
            config.navigation.guards.get("/favorites"),
            Some(&RoleSet::of(&[Role::Buyer]))
        );
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);

        let session_path = config.session.path.unwrap();
        assert!(session_path.is_absolute() || session_path.starts_with(file.path().parent().unwrap()));
        assert!(session_path.ends_with("state/session.json"));
    }

    #[test]
    fn test_load_toml_and_json() {
        let toml = r#"
[api]
base_url = "http://127.0.0.1:9000"

[navigation.guards]
"/inbox" = ["ADMIN", "AGENT", "BUYER"]
"#;
        let config = ConfigLoader::new()
            .with_env_vars(false)
            .load_from_str(toml, ConfigFormat::Toml)
            .unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.navigation.guards["/inbox"].len(), 3);

        let json = r#"{"session": {"backend": "memory"}}"#;
        let config = ConfigLoader::new()
            .with_env_vars(false)
            .load_from_str(json, ConfigFormat::Json)
            .unwrap();
        assert_eq!(config.session.backend, SessionBackend::Memory);
    }

    #[test]
    fn test_invalid_content() {
        let loader = ConfigLoader::new().with_env_vars(false);
        assert!(loader
            .load_from_str(r#"{"api": {"base_url": "localhost"}}"#, ConfigFormat::Json)
            .is_err());
        assert!(loader
            .load_from_str(r#"{"navigation": {"guards": {"/x": ["OWNER"]}}}"#, ConfigFormat::Json)
            .is_err());
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("estate.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("estate.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(ConfigFormat::from_path(Path::new("estate.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("estate")).is_err());
    }

    #[test]
    fn test_placeholders() {
        let env = lookup(&[("ESTATE_HOST", "api.example.com")]);
        assert_eq!(
            resolve_placeholders("url: https://${ESTATE_HOST}/x", &env),
            "url: https://api.example.com/x"
        );
        assert_eq!(resolve_placeholders("t: ${MISSING:30}", &env), "t: 30");
        assert_eq!(resolve_placeholders("t: ${MISSING}", &env), "t: ${MISSING}");
        assert_eq!(resolve_placeholders("t: ${OPEN", &env), "t: ${OPEN");
        assert_eq!(resolve_placeholders("cost: $5", &env), "cost: $5");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = EstateConfig::default();
        let env = lookup(&[
            ("ESTATE_API_BASE_URL", "https://override.example.com"),
            ("ESTATE_API_TIMEOUT_SECS", "5"),
            ("ESTATE_API_LOGOUT_ON_AUTH_FAILURE", "no"),
            ("ESTATE_SESSION_BACKEND", "memory"),
            ("ESTATE_LOG_LEVEL", "trace"),
        ]);
        apply_overrides(&mut config, "ESTATE", env).unwrap();

        assert_eq!(config.api.base_url, "https://override.example.com");
        assert_eq!(config.api.timeout_secs, 5);
        assert!(!config.api.logout_on_auth_failure);
        assert_eq!(config.session.backend, SessionBackend::Memory);
        assert_eq!(config.logging.level, LogLevel::Trace);
    }

    #[test]
    fn test_invalid_env_override() {
        let mut config = EstateConfig::default();
        let err = apply_overrides(&mut config, "ESTATE", lookup(&[("ESTATE_API_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(err.error_type(), "invalid_env_var");

        let err = apply_overrides(&mut config, "ESTATE", lookup(&[("ESTATE_SESSION_BACKEND", "redis")]))
            .unwrap_err();
        assert!(err.to_string().contains("ESTATE_SESSION_BACKEND"));
    }

    #[test]
    fn test_file_not_found() {
        let result = ConfigLoader::new().load("/nonexistent/path/estate.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_load_or_default() {
        let config = ConfigLoader::new()
            .with_env_vars(false)
            .load_or_default("/nonexistent/path/estate.yaml")
            .unwrap();
        assert_eq!(config, EstateConfig::default());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("ON"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
    }
}
