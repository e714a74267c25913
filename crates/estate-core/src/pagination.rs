// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client-side pagination of search results.
//!
//! The search endpoints return every match at once; the client slices them
//! into fixed-size pages.

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// Results shown per page on the search screens.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: usize,
    /// Page size used for slicing.
    pub per_page: usize,
    /// Total number of items across all pages.
    pub total_items: usize,
    /// Total number of pages (at least 1).
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Returns `true` if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns `true` if an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slices `items` into the requested 1-based page.
///
/// A page past the end yields an empty page rather than an error, so that a
/// shrinking result set never fails a "next page" request.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> CoreResult<Page<T>> {
    if page == 0 {
        return Err(CoreError::invalid_page("page numbers start at 1"));
    }
    if per_page == 0 {
        return Err(CoreError::invalid_page("page size cannot be zero"));
    }

    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = start.saturating_add(per_page).min(total_items);

    Ok(Page {
        items: items[start..end].to_vec(),
        page,
        per_page,
        total_items,
        total_pages,
    })
}
