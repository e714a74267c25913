// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core error types.

use thiserror::Error;

/// Errors raised by the foundation types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A role tag outside the closed set `ADMIN`, `AGENT`, `BUYER`.
    #[error("Unknown role tag: {tag}")]
    UnknownRole {
        /// The rejected tag.
        tag: String,
    },

    /// A page number or page size that cannot address any page.
    #[error("Invalid page request: {message}")]
    InvalidPage {
        /// Error message.
        message: String,
    },
}

impl CoreError {
    /// Creates an unknown role error.
    pub fn unknown_role(tag: impl Into<String>) -> Self {
        Self::UnknownRole { tag: tag.into() }
    }

    /// Creates an invalid page error.
    pub fn invalid_page(message: impl Into<String>) -> Self {
        Self::InvalidPage {
            message: message.into(),
        }
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            CoreError::UnknownRole { .. } => "unknown_role",
            CoreError::InvalidPage { .. } => "invalid_page",
        }
    }
}

/// A Result type with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
