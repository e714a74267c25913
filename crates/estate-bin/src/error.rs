// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the estate binary.

use thiserror::Error;

/// Result type alias for estate-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the estate binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Runtime error.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// The session may not open the page behind a command.
    #[error("Access denied to {route}: redirected to {redirect}")]
    Forbidden {
        /// Guarded route the command maps to.
        route: String,
        /// Redirect target chosen by the navigator.
        redirect: String,
    },

    /// Config parsing error.
    #[error("Config error: {0}")]
    Config(#[from] estate_config::ConfigError),

    /// Session error.
    #[error("Session error: {0}")]
    Session(#[from] estate_auth::SessionError),

    /// Route table error.
    #[error("Route error: {0}")]
    Route(#[from] estate_auth::RouteError),

    /// API error.
    #[error("API error: {0}")]
    Client(#[from] estate_client::ClientError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// The context description.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a runtime error.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Creates a forbidden error.
    pub fn forbidden(route: impl Into<String>, redirect: impl Into<String>) -> Self {
        Self::Forbidden {
            route: route.into(),
            redirect: redirect.into(),
        }
    }

    /// Adds context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Config(_) | Self::Route(_) => 1,
            Self::Runtime(_) => 3,
            Self::Session(_) => 4,
            Self::Forbidden { .. } => 5,
            Self::Client(e) if e.is_auth_failure() => 5,
            Self::Client(_) => 6,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Runtime(err.to_string())
    }
}

impl From<anyhow::Error> for BinError {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime(format!("{err:#}"))
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Reports an error with appropriate formatting.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {}", error);

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {}", cause);
        source = cause.source();
    }
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================
