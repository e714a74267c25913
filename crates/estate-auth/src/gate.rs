// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authorization gate.

use std::fmt;

use estate_core::{Role, RoleSet};
use tracing::debug;

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The target may be shown.
    Allow,
    /// The caller must navigate to the given target instead.
    Redirect(String),
}

impl Decision {
    /// Returns `true` for [`Decision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Returns the redirect target, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Redirect(to) => Some(to),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => write!(f, "ALLOW"),
            Decision::Redirect(to) => write!(f, "REDIRECT({to})"),
        }
    }
}

/// Decides whether `current` may enter a target guarded by `required`.
///
/// An empty `required` set is public and always allows. Otherwise the role
/// must be present and be a member of the set; there is no role hierarchy.
pub fn authorize(current: Option<Role>, required: &RoleSet, fallback: &str) -> Decision {
    if required.is_empty() {
        return Decision::Allow;
    }

    match current {
        Some(role) if required.contains(role) => Decision::Allow,
        _ => {
            debug!(
                role = current.map(|r| r.as_str()).unwrap_or("anonymous"),
                required = %required,
                fallback,
                "Authorization denied"
            );
            Decision::Redirect(fallback.to_string())
        }
    }
}
