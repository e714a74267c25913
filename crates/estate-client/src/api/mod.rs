// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed endpoint groups.
//!
//! Each module adds an `impl ApiClient` block for one area of the API.

pub mod admin;
pub mod favorites;
pub mod messages;
pub mod properties;
pub mod transactions;
pub mod users;

/// Minimum query length before suggestions are requested.
pub const MIN_SUGGESTION_CHARS: usize = 2;

pub(crate) fn suggestion_query(query: &str) -> Option<&str> {
    let query = query.trim();
    (query.chars().count() >= MIN_SUGGESTION_CHARS).then_some(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_query_threshold() {
        assert_eq!(suggestion_query("M"), None);
        assert_eq!(suggestion_query("  M  "), None);
        assert_eq!(suggestion_query("Ma"), Some("Ma"));
        assert_eq!(suggestion_query(" Marina "), Some("Marina"));
    }
}
