// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Property listing endpoints.

use estate_core::{paginate, ListingQuery, Page, Property, DEFAULT_PAGE_SIZE};
use reqwest::Method;

use super::suggestion_query;
use crate::client::{ApiClient, Auth};
use crate::error::{ClientError, ClientResult};

impl ApiClient {
    /// Searches listings. Blank filters are left out of the query.
    pub async fn search_properties(&self, query: &ListingQuery) -> ClientResult<Vec<Property>> {
        let req = self
            .request(Method::GET, &["properties", "search"], Auth::Public)?
            .query(&query.to_pairs());
        self.send_json(req, Auth::Public).await
    }

    /// Searches listings and returns one page of the results.
    pub async fn search_properties_page(
        &self,
        query: &ListingQuery,
        page: usize,
    ) -> ClientResult<Page<Property>> {
        let all = self.search_properties(query).await?;
        paginate(&all, page, DEFAULT_PAGE_SIZE).map_err(|e| ClientError::invalid_input(e.to_string()))
    }

    /// Suggests project names. Queries under two characters return nothing.
    pub async fn suggest_projects(&self, query: &str) -> ClientResult<Vec<String>> {
        self.suggest(&["properties", "suggest"], query).await
    }

    /// Suggests property types. Queries under two characters return nothing.
    pub async fn suggest_property_types(&self, query: &str) -> ClientResult<Vec<String>> {
        self.suggest(&["properties", "suggestPropertyType"], query).await
    }

    pub(crate) async fn suggest(&self, segments: &[&str], query: &str) -> ClientResult<Vec<String>> {
        let Some(query) = suggestion_query(query) else {
            return Ok(Vec::new());
        };
        let req = self
            .request(Method::GET, segments, Auth::Public)?
            .query(&[("query", query)]);
        self.send_json(req, Auth::Public).await
    }

    /// Lists the listings owned by the logged-in agent.
    pub async fn agent_properties(&self) -> ClientResult<Vec<Property>> {
        self.get_json(&["properties", "agent-properties"], Auth::Bearer)
            .await
    }

    /// Fetches one listing.
    pub async fn property(&self, id: i64) -> ClientResult<Property> {
        self.get_json(&["properties", &id.to_string()], Auth::Public)
            .await
    }

    /// Creates a listing.
    pub async fn add_property(&self, property: &Property) -> ClientResult<Property> {
        let req = self
            .request(Method::POST, &["properties", "add"], Auth::Bearer)?
            .json(property);
        self.send_json(req, Auth::Bearer).await
    }

    /// Replaces a listing.
    pub async fn update_property(&self, id: i64, property: &Property) -> ClientResult<Property> {
        let req = self
            .request(Method::PUT, &["properties", "update", &id.to_string()], Auth::Bearer)?
            .json(property);
        self.send_json(req, Auth::Bearer).await
    }

    /// Deletes a listing.
    pub async fn delete_property(&self, id: i64) -> ClientResult<()> {
        let req = self.request(
            Method::DELETE,
            &["properties", "delete", &id.to_string()],
            Auth::Bearer,
        )?;
        self.send_empty(req, Auth::Bearer).await
    }
}
