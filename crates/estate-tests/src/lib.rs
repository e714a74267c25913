// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Estate Integration Tests
//!
//! Integration tests for the estate listing client, with the shared
//! utilities they run on.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: signed tokens, listing data and storage doubles
//!   - `harness`: a stub listing API served on an ephemeral port
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p estate-tests
//!
//! # Run one suite
//! cargo test -p estate-tests --test integration_session
//! cargo test -p estate-tests --test integration_navigation
//! cargo test -p estate-tests --test integration_config
//! cargo test -p estate-tests --test integration_client
//! ```
//!
//! ## Test Categories
//!
//! ### Session Tests (`integration_session.rs`)
//! - Restore from file storage across process restarts
//! - Discarding expired, malformed and incomplete sessions
//! - Login and logout persistence, storage failures
//! - Concurrent readers during login and logout
//!
//! ### Navigation Tests (`integration_navigation.rs`)
//! - Route guards for every role
//! - Expiry observed at navigation time
//! - Configured guard overrides
//!
//! ### Config Tests (`integration_config.rs`)
//! - YAML, TOML and JSON files
//! - Placeholders and `ESTATE_*` overrides
//!
//! ### Client Tests (`integration_client.rs`)
//! - Login against the stub API
//! - Bearer handling and logout on rejected sessions
//! - Suggestions, paging and sorting

#![warn(missing_docs)]

pub mod common;
