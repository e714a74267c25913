// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-gated navigation.
//!
//! A navigation request starts as a [`PendingNavigation`] holding the role
//! observed at request time, and resolves exactly once into a terminal
//! [`Navigation`]. Nothing is cached between requests.

use std::collections::BTreeMap;
use std::sync::Arc;

use estate_core::Role;
use tracing::{debug, info};

use crate::gate::{authorize, Decision};
use crate::routes::{RouteMatch, RouteTable};
use crate::session::SessionStore;

/// Terminal outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The target route may be shown.
    Allowed {
        /// Pattern of the matched route.
        route: String,
        /// Captured path parameters.
        params: BTreeMap<String, String>,
    },
    /// The caller must go elsewhere.
    Redirected {
        /// Redirect target.
        to: String,
    },
}

impl Navigation {
    /// Returns `true` if the navigation was allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Navigation::Allowed { .. })
    }

    /// Returns the redirect target, if redirected.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Navigation::Redirected { to } => Some(to),
            Navigation::Allowed { .. } => None,
        }
    }

    /// Returns a captured path parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        match self {
            Navigation::Allowed { params, .. } => params.get(name).map(String::as_str),
            Navigation::Redirected { .. } => None,
        }
    }
}

/// A navigation request that has not been decided yet.
#[derive(Debug, Clone)]
#[must_use = "a pending navigation does nothing until resolved"]
pub struct PendingNavigation {
    path: String,
    target: Option<RouteMatch>,
    role: Option<Role>,
    fallback: String,
}

impl PendingNavigation {
    /// Returns the requested path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the role observed when the request was made.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Decides the request.
    pub fn resolve(self) -> Navigation {
        let Some(target) = self.target else {
            debug!(path = %self.path, fallback = %self.fallback, "No route matches path");
            return Navigation::Redirected { to: self.fallback };
        };

        match authorize(self.role, &target.required, &self.fallback) {
            Decision::Allow => Navigation::Allowed {
                route: target.pattern,
                params: target.params,
            },
            Decision::Redirect(to) => {
                info!(
                    path = %self.path,
                    route = %target.pattern,
                    required = %target.required,
                    to = %to,
                    "Navigation redirected"
                );
                Navigation::Redirected { to }
            }
        }
    }
}

/// Resolves paths against a route table using the live session.
#[derive(Debug, Clone)]
pub struct Navigator {
    store: Arc<SessionStore>,
    routes: RouteTable,
}

impl Navigator {
    /// Creates a navigator.
    pub fn new(store: Arc<SessionStore>, routes: RouteTable) -> Self {
        Self { store, routes }
    }

    /// Returns the route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Returns the session store.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Starts a navigation request.
    ///
    /// Expiry is enforced first, so an expired session is cleared before
    /// its role could be observed.
    pub fn begin(&self, path: &str) -> PendingNavigation {
        self.store.enforce_expiry();
        PendingNavigation {
            path: path.to_string(),
            target: self.routes.resolve(path),
            role: self.store.current_role(),
            fallback: self.routes.fallback().to_string(),
        }
    }

    /// Starts and resolves a navigation request.
    pub fn navigate(&self, path: &str) -> Navigation {
        self.begin(path).resolve()
    }
}
