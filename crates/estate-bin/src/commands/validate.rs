// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use estate_config::{EstateConfig, LoggingConfig, SessionBackend};

use super::print_json;
use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::context::build_routes;
use crate::error::{BinError, BinResult};
use crate::logging::init_logging;

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: &ValidateArgs) -> BinResult<()> {
    let logging = LoggingConfig::default();
    init_logging(&cli.effective_log_level(&logging), cli.effective_log_format(&logging));

    let config_path = &cli.config;
    if !config_path.exists() {
        return Err(BinError::config(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let config = estate_config::load_config(config_path)
        .map_err(|e| BinError::config(format!("Configuration validation failed: {e}")))?;
    let routes = build_routes(&config.navigation)
        .map_err(|e| BinError::config(format!("Invalid route guard override: {e}")))?;
    let warnings = collect_warnings(&config);

    match args.format {
        OutputFormat::Text => {
            println!("Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  API:             {}", config.api.base_url);
            println!("  Timeout:         {}s", config.api.timeout_secs);
            println!("  Session backend: {}", config.session.backend.as_str());
            if let Some(path) = config.session.effective_path() {
                if config.session.backend == SessionBackend::File {
                    println!("  Session file:    {}", path.display());
                }
            }
            println!("  Routes:          {}", routes.routes().len());
            println!("  Guard overrides: {}", config.navigation.guards.len());
            println!("  Fallback:        {}", routes.fallback());

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  - {warning}");
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                print_json(&config)?;
            }
        }
        OutputFormat::Json => {
            print_json(&serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "base_url": config.api.base_url,
                    "session_backend": config.session.backend.as_str(),
                    "routes": routes.routes().len(),
                    "guard_overrides": config.navigation.guards.len(),
                    "fallback": routes.fallback(),
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            }))?;
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

/// Returns non-fatal findings about a valid configuration.
pub(crate) fn collect_warnings(config: &EstateConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    let url = config.api.base_url.trim();
    let local = ["http://localhost", "http://127.0.0.1", "http://[::1]"]
        .iter()
        .any(|prefix| url.starts_with(prefix));
    if url.starts_with("http://") && !local {
        warnings.push(format!("API base URL {url} is not encrypted; tokens travel in clear text"));
    }

    if config.session.backend == SessionBackend::Memory {
        warnings.push("Memory session backend: logins do not persist between commands".to_string());
    }

    if !config.api.logout_on_auth_failure {
        warnings.push("logout_on_auth_failure is disabled: rejected sessions are kept".to_string());
    }

    for (pattern, required) in &config.navigation.guards {
        if required.is_empty() && (pattern == "/admin/users" || pattern == "/manage-properties") {
            warnings.push(format!("Guard override makes {pattern} public"));
        }
    }

    warnings
}
