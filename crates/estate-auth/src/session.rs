// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session store.
//!
//! [`SessionStore`] is the single owner of the current session. It is built
//! by [`SessionStore::restore`], which reads and validates the persisted
//! session before anything else can observe it. After that the session only
//! changes through [`login`](SessionStore::login),
//! [`logout`](SessionStore::logout) and
//! [`enforce_expiry`](SessionStore::enforce_expiry).
//!
//! # Concurrency
//!
//! Mutations take the write lock and hold it across persistence I/O, so
//! mutations are serialized and a reader sees either the state before a
//! mutation or the state after it. Reads take the read lock and clone.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use estate_core::Role;

use crate::codec::{self, Claims, DecodeError};
use crate::storage::{SessionStorage, StorageError, TOKEN_KEY, USER_ID_KEY};

/// Clock used to evaluate expiry.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

// =============================================================================
// SessionError
// =============================================================================

/// Errors returned by session mutations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The token could not be decoded.
    #[error("Invalid token: {0}")]
    Decode(#[from] DecodeError),

    /// The token has already expired.
    #[error("Token expired")]
    Expired,

    /// Persistent storage failed.
    #[error("Session unavailable: {0}")]
    Unavailable(#[from] StorageError),
}

impl SessionError {
    /// Returns `true` if the error came from storage.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SessionError::Unavailable(_))
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            SessionError::Decode(_) => "decode",
            SessionError::Expired => "expired",
            SessionError::Unavailable(_) => "unavailable",
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

// =============================================================================
// Session
// =============================================================================

/// A point-in-time view of the session.
///
/// Either every field is present or none is.
#[derive(Clone, Default, PartialEq)]
pub struct Session {
    /// Bearer token.
    pub token: Option<String>,
    /// Account identifier.
    pub user_id: Option<String>,
    /// Role decoded from the token.
    pub role: Option<Role>,
}

impl Session {
    /// The empty (logged-out) session.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if the session carries a token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .finish()
    }
}

/// Why `restore` discarded a persisted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    /// The token did not decode.
    Invalid,
    /// The token had expired.
    Expired,
    /// Only one of token and user id was persisted.
    Incomplete,
}

impl ClearReason {
    /// Returns the reason as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClearReason::Invalid => "invalid",
            ClearReason::Expired => "expired",
            ClearReason::Incomplete => "incomplete",
        }
    }
}

/// What happened when the session was restored at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing was persisted.
    Empty,
    /// A valid session was restored.
    Restored {
        /// Restored role.
        role: Role,
    },
    /// A persisted session was discarded.
    Cleared(ClearReason),
    /// Storage could not be read.
    Unavailable,
}

// =============================================================================
// SessionStore
// =============================================================================

#[derive(Clone)]
struct Active {
    token: String,
    user_id: String,
    claims: Claims,
}

/// Owner of the process-wide session.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    state: RwLock<Option<Active>>,
    outcome: RestoreOutcome,
    clock: Clock,
}

impl SessionStore {
    /// Restores the session from `storage`.
    ///
    /// Never fails: unreadable, invalid or expired state leaves the session
    /// empty, and the reason is available from [`restore_outcome`](Self::restore_outcome).
    pub fn restore(storage: impl SessionStorage + 'static) -> Self {
        Self::restore_with_clock(storage, Arc::new(Utc::now))
    }

    /// Restores the session using a custom clock.
    pub fn restore_with_clock(storage: impl SessionStorage + 'static, clock: Clock) -> Self {
        let storage: Box<dyn SessionStorage> = Box::new(storage);
        let (state, outcome) = Self::load(storage.as_ref(), clock());

        match outcome {
            RestoreOutcome::Restored { role } => {
                info!(backend = storage.backend(), role = %role, "Session restored")
            }
            RestoreOutcome::Cleared(reason) => {
                info!(backend = storage.backend(), reason = reason.as_str(), "Persisted session discarded")
            }
            RestoreOutcome::Empty => debug!(backend = storage.backend(), "No persisted session"),
            RestoreOutcome::Unavailable => {}
        }

        Self {
            storage,
            state: RwLock::new(state),
            outcome,
            clock,
        }
    }

    fn load(storage: &dyn SessionStorage, now: DateTime<Utc>) -> (Option<Active>, RestoreOutcome) {
        let read = storage
            .load(TOKEN_KEY)
            .and_then(|token| Ok((token, storage.load(USER_ID_KEY)?)));

        let (token, user_id) = match read {
            Ok(pair) => pair,
            Err(e) => {
                warn!(backend = storage.backend(), error = %e, "Session storage unreadable");
                return (None, RestoreOutcome::Unavailable);
            }
        };

        let (token, user_id) = match (token, user_id) {
            (None, None) => return (None, RestoreOutcome::Empty),
            (Some(token), Some(user_id)) => (token, user_id),
            _ => return Self::discard(storage, ClearReason::Incomplete),
        };

        let claims = match codec::decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error_type = e.error_type(), "Persisted token rejected");
                return Self::discard(storage, ClearReason::Invalid);
            }
        };

        if codec::is_expired(&claims, now) {
            return Self::discard(storage, ClearReason::Expired);
        }

        let role = claims.role;
        (
            Some(Active {
                token,
                user_id,
                claims,
            }),
            RestoreOutcome::Restored { role },
        )
    }

    fn discard(storage: &dyn SessionStorage, reason: ClearReason) -> (Option<Active>, RestoreOutcome) {
        if let Err(e) = clear_storage(storage) {
            warn!(reason = reason.as_str(), error = %e, "Failed to clear persisted session");
        }
        (None, RestoreOutcome::Cleared(reason))
    }

    /// Returns what happened during restoration.
    pub fn restore_outcome(&self) -> RestoreOutcome {
        self.outcome
    }

    /// Returns the storage backend name.
    pub fn backend(&self) -> &'static str {
        self.storage.backend()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Establishes a session from a login response.
    ///
    /// The token is decoded and checked for expiry before anything is
    /// persisted. On any error the session is left as it was.
    pub fn login(&self, token: &str, user_id: &str) -> SessionResult<Role> {
        let claims = codec::decode(token)?;
        if codec::is_expired(&claims, (self.clock)()) {
            return Err(SessionError::Expired);
        }

        let mut state = self.state.write();

        if let Err(e) = persist(self.storage.as_ref(), token, user_id) {
            let rollback = match state.as_ref() {
                Some(prev) => persist(self.storage.as_ref(), &prev.token, &prev.user_id),
                None => clear_storage(self.storage.as_ref()),
            };
            if let Err(rollback_err) = rollback {
                warn!(error = %rollback_err, "Failed to roll back session storage");
            }
            warn!(error = %e, "Login not persisted");
            return Err(e.into());
        }

        let role = claims.role;
        *state = Some(Active {
            token: token.to_string(),
            user_id: user_id.to_string(),
            claims,
        });

        info!(role = %role, user_id = %user_id, "Session established");
        Ok(role)
    }

    /// Ends the session.
    ///
    /// The in-memory session is emptied unconditionally before storage is
    /// cleared, so a storage error still leaves the caller logged out.
    /// Calling this on an empty session is a no-op apart from storage.
    pub fn logout(&self) -> SessionResult<()> {
        let mut state = self.state.write();
        let was_active = state.take().is_some();

        let result = clear_storage(self.storage.as_ref());
        if was_active {
            info!("Session ended");
        }
        result.map_err(SessionError::from)
    }

    /// Ends the session only if it still holds `token`.
    ///
    /// Returns `Ok(false)` and leaves everything untouched when the session
    /// is empty or was replaced by a later login.
    pub fn logout_if_token(&self, token: &str) -> SessionResult<bool> {
        let mut state = self.state.write();
        if state.as_ref().map(|active| active.token.as_str()) != Some(token) {
            debug!("Session changed since the request; keeping it");
            return Ok(false);
        }

        *state = None;
        info!("Session ended");
        clear_storage(self.storage.as_ref())
            .map(|()| true)
            .map_err(SessionError::from)
    }

    /// Clears the session if its token has expired.
    ///
    /// Returns `true` if a session was cleared.
    pub fn enforce_expiry(&self) -> bool {
        let mut state = self.state.write();
        let expired = state
            .as_ref()
            .is_some_and(|active| codec::is_expired(&active.claims, (self.clock)()));
        if !expired {
            return false;
        }

        *state = None;
        if let Err(e) = clear_storage(self.storage.as_ref()) {
            warn!(error = %e, "Failed to clear expired session");
        }
        info!("Session expired");
        true
    }

    // =========================================================================
    // Reads
    // =========================================================================

    fn live(&self) -> Option<Active> {
        let state = self.state.read();
        state
            .as_ref()
            .filter(|active| !codec::is_expired(&active.claims, (self.clock)()))
            .cloned()
    }

    /// Returns the current role, or `None` when logged out or expired.
    pub fn current_role(&self) -> Option<Role> {
        self.live().map(|active| active.claims.role)
    }

    /// Returns the current user id, or `None` when logged out or expired.
    pub fn current_user_id(&self) -> Option<String> {
        self.live().map(|active| active.user_id)
    }

    /// Returns the current bearer token, or `None` when logged out or expired.
    pub fn current_token(&self) -> Option<String> {
        self.live().map(|active| active.token)
    }

    /// Returns the decoded claims of the current session.
    pub fn current_claims(&self) -> Option<Claims> {
        self.live().map(|active| active.claims)
    }

    /// Returns a consistent view of the whole session.
    pub fn snapshot(&self) -> Session {
        match self.live() {
            Some(active) => Session {
                role: Some(active.claims.role),
                token: Some(active.token),
                user_id: Some(active.user_id),
            },
            None => Session::empty(),
        }
    }

    /// Returns the `Authorization` header value for the current session.
    pub fn bearer_header(&self) -> Option<String> {
        self.current_token().map(|token| format!("Bearer {token}"))
    }

    /// Returns `true` if a live session exists.
    pub fn is_authenticated(&self) -> bool {
        self.live().is_some()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("backend", &self.storage.backend())
            .field("outcome", &self.outcome)
            .field("session", &self.snapshot())
            .finish()
    }
}

fn persist(storage: &dyn SessionStorage, token: &str, user_id: &str) -> Result<(), StorageError> {
    storage.store(TOKEN_KEY, token)?;
    storage.store(USER_ID_KEY, user_id)
}

/// Removes both keys, attempting the second even if the first fails.
fn clear_storage(storage: &dyn SessionStorage) -> Result<(), StorageError> {
    let token = storage.remove(TOKEN_KEY);
    let user_id = storage.remove(USER_ID_KEY);
    token.and(user_id)
}

// =============================================================================
// Tests
// =============================================================================
