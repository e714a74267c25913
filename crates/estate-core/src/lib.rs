// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # estate-core
//!
//! Foundation types shared by every estate crate.
//!
//! - [`Role`] and [`RoleSet`]: the closed set of account roles and the
//!   role requirements attached to guarded routes
//! - [`types`]: request and response payloads of the listing API
//! - [`pagination`]: client-side paging of search results

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod pagination;
pub mod role;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{CoreError, CoreResult};
pub use pagination::{paginate, Page, DEFAULT_PAGE_SIZE};
pub use role::{Role, RoleSet};
pub use types::{
    AdminUserRequest, ListingQuery, LoginRequest, LoginResponse, Message, NewMessage,
    ProfileUpdate, Property, RegisterRequest, RegisterResponse, Transaction, UserProfile,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "estate-core");
    }
}
