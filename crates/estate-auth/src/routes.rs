// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route table.
//!
//! Each route pairs a path pattern with the set of roles allowed to enter it.
//! Patterns are matched segment by segment; a `:name` segment captures one
//! non-empty path segment. The first matching route in declaration order wins.

use std::collections::BTreeMap;
use std::fmt;

use estate_core::{Role, RoleSet};
use thiserror::Error;

/// Default redirect target for denied navigation.
pub const DEFAULT_FALLBACK: &str = "/";

/// Patterns of the application's routes, in matching order.
pub const STANDARD_ROUTES: [&str; 13] = [
    "/",
    "/login",
    "/signup",
    "/profile/:id",
    "/manage-properties",
    "/properties/:propertyId",
    "/transaction-search",
    "/transactions/:projectName/last5",
    "/transactions/:id",
    "/inbox",
    "/messages/:messageId",
    "/favorites",
    "/admin/users",
];

/// Route table errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The pattern is not a valid route pattern.
    #[error("Invalid route pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Reason.
        message: String,
    },

    /// No route has the given pattern.
    #[error("Unknown route '{pattern}'")]
    UnknownRoute {
        /// Pattern looked up.
        pattern: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

// =============================================================================
// RouteGuard
// =============================================================================

/// A route pattern and the roles allowed to enter it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    pattern: String,
    segments: Vec<Segment>,
    required: RoleSet,
}

impl RouteGuard {
    /// Parses a route pattern such as `/properties/:propertyId`.
    pub fn new(pattern: &str, required: RoleSet) -> Result<Self, RouteError> {
        let invalid = |message: &str| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            message: message.to_string(),
        };

        if !pattern.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }
        if pattern.contains(['?', '#']) {
            return Err(invalid("must not contain a query or fragment"));
        }

        let mut segments = Vec::new();
        for raw in split_segments(pattern) {
            match raw.strip_prefix(':') {
                Some("") => return Err(invalid("parameter name is empty")),
                Some(name) => segments.push(Segment::Param(name.to_string())),
                None => segments.push(Segment::Literal(raw.to_string())),
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            required,
        })
    }

    /// Returns the pattern as written.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the roles allowed to enter. Empty means public.
    pub fn required(&self) -> RoleSet {
        self.required
    }

    /// Returns `true` if anyone may enter.
    pub fn is_public(&self) -> bool {
        self.required.is_empty()
    }

    fn matches(&self, path: &[&str]) -> Option<BTreeMap<String, String>> {
        if path.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, value) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(lit) if lit == value => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*value).to_string());
                }
            }
        }
        Some(params)
    }
}

impl fmt::Display for RouteGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.pattern, self.required)
    }
}

/// A route matched against a concrete path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Pattern of the matched route.
    pub pattern: String,
    /// Roles allowed to enter.
    pub required: RoleSet,
    /// Captured `:name` segments.
    pub params: BTreeMap<String, String>,
}

// =============================================================================
// RouteTable
// =============================================================================

/// An ordered set of guarded routes with a fallback target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteGuard>,
    fallback: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            routes: Vec::new(),
            fallback: fallback.into(),
        }
    }

    /// Returns the application's route table.
    pub fn standard() -> Self {
        let staff = RoleSet::of(&[Role::Admin, Role::Agent]);
        let admin = RoleSet::of(&[Role::Admin]);
        let public = RoleSet::public();

        let guard_for = |pattern: &str| match pattern {
            "/manage-properties" => staff,
            "/admin/users" => admin,
            _ => public,
        };

        let routes = STANDARD_ROUTES
            .iter()
            .filter_map(|pattern| RouteGuard::new(pattern, guard_for(pattern)).ok())
            .collect();
        Self {
            routes,
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }

    /// Appends a route.
    pub fn with_route(mut self, pattern: &str, required: RoleSet) -> Result<Self, RouteError> {
        self.routes.push(RouteGuard::new(pattern, required)?);
        Ok(self)
    }

    /// Sets the fallback target.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Replaces the guard of an existing route.
    ///
    /// An exact pattern match wins. Otherwise the pattern is compared
    /// ignoring ASCII case: YAML config keys arrive lower-cased, which turns
    /// `/properties/:propertyId` into `/properties/:propertyid`.
    pub fn set_guard(&mut self, pattern: &str, required: RoleSet) -> Result<(), RouteError> {
        let index = self
            .routes
            .iter()
            .position(|r| r.pattern == pattern)
            .or_else(|| {
                self.routes
                    .iter()
                    .position(|r| r.pattern.eq_ignore_ascii_case(pattern))
            })
            .ok_or_else(|| RouteError::UnknownRoute {
                pattern: pattern.to_string(),
            })?;
        self.routes[index].required = required;
        Ok(())
    }

    /// Returns the fallback target.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Returns the routes in declaration order.
    pub fn routes(&self) -> &[RouteGuard] {
        &self.routes
    }

    /// Returns the route with the given pattern.
    pub fn get(&self, pattern: &str) -> Option<&RouteGuard> {
        self.routes.iter().find(|r| r.pattern == pattern)
    }

    /// Matches a concrete path. Query strings and fragments are ignored.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = strip_query(path);
        let segments: Vec<&str> = split_segments(path).collect();

        self.routes.iter().find_map(|route| {
            route.matches(&segments).map(|params| RouteMatch {
                pattern: route.pattern.clone(),
                required: route.required,
                params,
            })
        })
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = RouteTable::standard();
        assert_eq!(table.routes().len(), 13);
        assert_eq!(table.fallback(), "/");
        assert_eq!(
            table.get("/manage-properties").unwrap().required(),
            RoleSet::of(&[Role::Admin, Role::Agent])
        );
        assert_eq!(
            table.get("/admin/users").unwrap().required(),
            RoleSet::of(&[Role::Admin])
        );
        assert!(table.get("/favorites").unwrap().is_public());
    }

    #[test]
    fn test_standard_patterns_all_parse() {
        let table = RouteTable::standard();
        for pattern in STANDARD_ROUTES {
            assert!(RouteGuard::new(pattern, RoleSet::public()).is_ok(), "{pattern}");
            assert!(table.get(pattern).is_some(), "{pattern} missing");
        }
        let patterns: Vec<_> = table.routes().iter().map(RouteGuard::pattern).collect();
        assert_eq!(patterns, STANDARD_ROUTES);
    }

    #[test]
    fn test_set_guard_ignores_key_case() {
        let mut table = RouteTable::standard();
        table
            .set_guard("/properties/:propertyid", RoleSet::of(&[Role::Buyer]))
            .unwrap();
        table
            .set_guard("/transactions/:projectname/last5", RoleSet::of(&[Role::Agent]))
            .unwrap();

        let m = table.resolve("/properties/9").unwrap();
        assert_eq!(m.required, RoleSet::of(&[Role::Buyer]));
        assert_eq!(m.params["propertyId"], "9");
        assert_eq!(
            table.get("/transactions/:projectName/last5").unwrap().required(),
            RoleSet::of(&[Role::Agent])
        );
        assert!(table.get("/transactions/:id").unwrap().is_public());
    }

    #[test]
    fn test_resolve_params() {
        let table = RouteTable::standard();

        let m = table.resolve("/properties/17").unwrap();
        assert_eq!(m.pattern, "/properties/:propertyId");
        assert_eq!(m.params.get("propertyId").map(String::as_str), Some("17"));

        let m = table.resolve("/").unwrap();
        assert_eq!(m.pattern, "/");
        assert!(m.params.is_empty());
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::standard();

        let m = table.resolve("/transactions/Sky%20Tower/last5").unwrap();
        assert_eq!(m.pattern, "/transactions/:projectName/last5");
        assert_eq!(m.params["projectName"], "Sky%20Tower");

        let m = table.resolve("/transactions/42").unwrap();
        assert_eq!(m.pattern, "/transactions/:id");
    }

    #[test]
    fn test_resolve_ignores_query_and_trailing_slash() {
        let table = RouteTable::standard();
        assert_eq!(
            table.resolve("/admin/users/?page=2#top").unwrap().pattern,
            "/admin/users"
        );
        assert!(table.resolve("/nowhere").is_none());
        assert!(table.resolve("/properties").is_none());
        assert!(table.resolve("/properties/1/extra").is_none());
    }

    #[test]
    fn test_overrides() {
        let mut table = RouteTable::standard().with_fallback("/login");
        table
            .set_guard("/favorites", RoleSet::of(&[Role::Buyer]))
            .unwrap();
        assert_eq!(table.resolve("/favorites").unwrap().required.len(), 1);
        assert_eq!(table.fallback(), "/login");

        let err = table.set_guard("/missing", RoleSet::public()).unwrap_err();
        assert!(matches!(err, RouteError::UnknownRoute { .. }));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(RouteGuard::new("inbox", RoleSet::public()).is_err());
        assert!(RouteGuard::new("/a/:", RoleSet::public()).is_err());
        assert!(RouteGuard::new("/a?b", RoleSet::public()).is_err());
        let table = RouteTable::new("/")
            .with_route("/reports/:year", RoleSet::of(&[Role::Admin]))
            .unwrap();
        assert_eq!(table.resolve("/reports/2024").unwrap().params["year"], "2024");
    }
}
