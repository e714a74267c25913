// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account roles and role sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// =============================================================================
// Role
// =============================================================================

/// Account roles.
///
/// Roles are mutually exclusive: every account carries exactly one. There is
/// no hierarchy between them, so an `Admin` does not implicitly act as an
/// `Agent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Manages user accounts and every listing.
    Admin,
    /// Creates and maintains property and transaction records.
    Agent,
    /// Searches listings, keeps favorites and sends messages.
    Buyer,
}

impl Role {
    /// Returns the role tag as carried in token claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Agent => "AGENT",
            Role::Buyer => "BUYER",
        }
    }

    /// Parses a role tag.
    ///
    /// Matching is exact: `"admin"` is not a role tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Role::Admin),
            "AGENT" => Some(Role::Agent),
            "BUYER" => Some(Role::Buyer),
            _ => None,
        }
    }

    /// Returns all roles.
    pub fn all() -> &'static [Role] {
        &[Role::Admin, Role::Agent, Role::Buyer]
    }

    fn bit(self) -> u8 {
        match self {
            Role::Admin => 0b001,
            Role::Agent => 0b010,
            Role::Buyer => 0b100,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| CoreError::unknown_role(s))
    }
}

// =============================================================================
// RoleSet
// =============================================================================

/// A set of roles.
///
/// An empty set marks a public route; a non-empty set lists every role that
/// may enter a guarded route.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet {
    bits: u8,
}

impl RoleSet {
    /// Creates an empty role set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The empty set, used for public routes.
    pub fn public() -> Self {
        Self::default()
    }

    /// Creates a set from a slice of roles.
    pub fn of(roles: &[Role]) -> Self {
        roles.iter().copied().collect()
    }

    /// Adds a role to the set.
    pub fn add(&mut self, role: Role) {
        self.bits |= role.bit();
    }

    /// Removes a role from the set.
    pub fn remove(&mut self, role: Role) {
        self.bits &= !role.bit();
    }

    /// Returns `true` if the set contains the given role.
    pub fn contains(&self, role: Role) -> bool {
        self.bits & role.bit() != 0
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns the number of roles in the set.
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns an iterator over the roles, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::all().iter().copied().filter(|r| self.contains(*r))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::new();
        for role in iter {
            set.add(role);
        }
        set
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        roles.into_iter().collect()
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "public");
        }
        let tags: Vec<&str> = self.iter().map(|r| r.as_str()).collect();
        write!(f, "{}", tags.join("|"))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_exact() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("AGENT"), Some(Role::Agent));
        assert_eq!(Role::parse("BUYER"), Some(Role::Buyer));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(" ADMIN"), None);
        assert!("OWNER".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_uses_tags() {
        assert_eq!(serde_json::to_string(&Role::Agent).unwrap(), "\"AGENT\"");
        let role: Role = serde_json::from_str("\"BUYER\"").unwrap();
        assert_eq!(role, Role::Buyer);
        assert!(serde_json::from_str::<Role>("\"buyer\"").is_err());
    }

    #[test]
    fn test_role_set_membership() {
        let set = RoleSet::of(&[Role::Admin, Role::Agent]);
        assert!(set.contains(Role::Admin));
        assert!(set.contains(Role::Agent));
        assert!(!set.contains(Role::Buyer));
        assert_eq!(set.len(), 2);
        assert!(RoleSet::public().is_empty());
    }

    #[test]
    fn test_role_set_add_remove() {
        let mut set = RoleSet::new();
        set.add(Role::Buyer);
        set.add(Role::Buyer);
        assert_eq!(set.len(), 1);
        set.remove(Role::Buyer);
        assert!(set.is_empty());
    }

    #[test]
    fn test_role_set_serde_and_display() {
        let set = RoleSet::of(&[Role::Agent, Role::Admin]);
        assert_eq!(serde_json::to_string(&set).unwrap(), "[\"ADMIN\",\"AGENT\"]");
        let parsed: RoleSet = serde_json::from_str("[\"BUYER\"]").unwrap();
        assert_eq!(parsed, RoleSet::of(&[Role::Buyer]));
        assert_eq!(set.to_string(), "ADMIN|AGENT");
        assert_eq!(RoleSet::public().to_string(), "public");
    }
}
