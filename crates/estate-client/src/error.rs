// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client error types.

use estate_auth::SessionError;
use thiserror::Error;

/// Errors returned by [`ApiClient`](crate::ApiClient) calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The call needs a session and there is none. No request was sent.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The server rejected the credentials (401) or the role (403).
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
        /// Server message.
        message: String,
    },

    /// The server answered with another error status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server message.
        message: String,
    },

    /// The request could not be sent or the response not received.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {message}")]
    Decode {
        /// Parser message.
        message: String,
    },

    /// The login response could not establish a session.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The call was rejected before sending.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Reason.
        message: String,
    },
}

impl ClientError {
    /// Creates an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(status: u16, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            status,
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Returns `true` if the caller should be treated as logged out.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::NotAuthenticated | ClientError::Unauthorized { .. }
        )
    }

    /// Returns `true` for a 404 response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }

    /// Returns the HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized { status, .. } | ClientError::Api { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            ClientError::NotAuthenticated => "not_authenticated",
            ClientError::Unauthorized { .. } => "unauthorized",
            ClientError::Api { .. } => "api",
            ClientError::Transport(_) => "transport",
            ClientError::Decode { .. } => "decode",
            ClientError::Session(_) => "session",
            ClientError::InvalidInput { .. } => "invalid_input",
        }
    }
}

/// A Result type with ClientError.
pub type ClientResult<T> = Result<T, ClientError>;
