// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # estate-client
//!
//! REST client for the listing API.
//!
//! [`ApiClient`] reads the bearer token from a shared
//! [`SessionStore`](estate_auth::SessionStore) for every authenticated call.
//! Calls that need a session fail with [`ClientError::NotAuthenticated`]
//! before anything is sent, and a 401/403 answer ends the session unless
//! disabled with [`ApiClient::with_logout_on_auth_failure`].
//!
//! ```no_run
//! # async fn demo() -> Result<(), estate_client::ClientError> {
//! use std::sync::Arc;
//! use estate_auth::{MemoryStorage, SessionStore};
//! use estate_client::ApiClient;
//!
//! let store = Arc::new(SessionStore::restore(MemoryStorage::new()));
//! let client = ApiClient::new("http://localhost:8081", store)?;
//! let who = client.login("agent@example.com", "secret").await?;
//! println!("logged in as {}", who.role);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod client;
pub mod error;

pub use api::users::LoggedIn;
pub use api::MIN_SUGGESTION_CHARS;
pub use client::ApiClient;
pub use error::{ClientError, ClientResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
