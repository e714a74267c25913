// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # estate-config
//!
//! Configuration management for the estate listing client.
//!
//! ## Quick Start
//!
//! ```no_run
//! use estate_config::loader::load_config;
//!
//! let config = load_config("estate.yaml").unwrap();
//! println!("API: {}", config.api.base_url);
//! ```
//!
//! ## Configuration Schema
//!
//! - `api` - remote API base URL, timeout, auth-failure policy
//! - `session` - session storage backend and file path
//! - `navigation` - fallback target and route guard overrides
//! - `logging` - log level and format
//!
//! ```yaml
//! api:
//!   base_url: "${ESTATE_API:http://localhost:8081}"
//! session:
//!   backend: file
//! navigation:
//!   guards:
//!     /favorites: [BUYER]
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{
    default_session_path, ApiConfig, EstateConfig, LogFormat, LogLevel, LoggingConfig,
    NavigationConfig, SessionBackend, SessionConfig,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert_eq!(NAME, "estate-config");
    }
}
