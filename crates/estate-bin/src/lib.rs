// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # estate-bin
//!
//! Command-line client for the estate listing service.
//!
//! - CLI argument parsing with clap
//! - Logging initialization
//! - Wiring from configuration to session, navigator and API client
//! - Command implementations
//!
//! ## Architecture
//!
//! ```text
//!                main.rs
//!                   │
//!                cli.rs ──► commands ──► context
//!                                          │
//!                  ┌───────────────────────┼──────────────────┐
//!                  ▼                       ▼                  ▼
//!            estate-config           estate-auth        estate-client
//!           (EstateConfig)     (SessionStore, Navigator)  (ApiClient)
//! ```
//!
//! ## Usage
//!
//! ```bash
//! estate login agent@example.com -p secret
//! estate whoami
//! estate navigate /manage-properties
//! estate properties mine
//! estate admin users        # refused unless logged in as ADMIN
//! estate logout
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod logging;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use context::AppContext;
pub use error::{BinError, BinResult};
pub use logging::init_logging;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
