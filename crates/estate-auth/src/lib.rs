// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # estate-auth
//!
//! Session and authorization model of the estate listing client.
//!
//! - [`codec`]: bearer-token decoding into [`Claims`] and expiry checks
//! - [`storage`]: durable key-value persistence of the session
//! - [`session`]: the [`SessionStore`], single writer of the session
//! - [`gate`]: the pure ALLOW/REDIRECT decision for guarded routes
//! - [`routes`] and [`navigation`]: the route table and the navigator that
//!   evaluates the gate on every navigation
//!
//! ## Trust model
//!
//! Roles are read from a token the client decodes itself; the signature is
//! never verified here. Gating in this crate only decides what the client
//! shows. The server re-checks authorization on every privileged request.

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod codec;
pub mod gate;
pub mod navigation;
pub mod routes;
pub mod session;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use codec::{decode, is_expired, Claims, DecodeError};
pub use gate::{authorize, Decision};
pub use navigation::{Navigation, Navigator, PendingNavigation};
pub use routes::{
    RouteError, RouteGuard, RouteMatch, RouteTable, DEFAULT_FALLBACK, STANDARD_ROUTES,
};
pub use session::{
    ClearReason, Clock, RestoreOutcome, Session, SessionError, SessionResult, SessionStore,
};
pub use storage::{
    FileStorage, MemoryStorage, SessionStorage, StorageError, TOKEN_KEY, USER_ID_KEY,
};

pub use estate_core::{Role, RoleSet};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
