// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Favorite listings of the logged-in buyer.

use std::cmp::Reverse;

use estate_core::Property;
use reqwest::Method;

use crate::client::{ApiClient, Auth};
use crate::error::ClientResult;

impl ApiClient {
    /// Lists favorite listings, most recently listed first.
    pub async fn favorites(&self) -> ClientResult<Vec<Property>> {
        let mut favorites: Vec<Property> = self.get_json(&["favorites"], Auth::Bearer).await?;
        favorites.sort_by_key(|p| Reverse(p.id));
        Ok(favorites)
    }

    /// Adds a listing to the favorites.
    pub async fn add_favorite(&self, property_id: i64) -> ClientResult<()> {
        let req = self.request(
            Method::POST,
            &["favorites", "add", &property_id.to_string()],
            Auth::Bearer,
        )?;
        self.send_empty(req, Auth::Bearer).await
    }

    /// Removes a listing from the favorites.
    pub async fn remove_favorite(&self, property_id: i64) -> ClientResult<()> {
        let req = self.request(
            Method::DELETE,
            &["favorites", "remove", &property_id.to_string()],
            Auth::Bearer,
        )?;
        self.send_empty(req, Auth::Bearer).await
    }
}
