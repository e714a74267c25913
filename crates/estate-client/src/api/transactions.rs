// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Sale transaction endpoints.

use estate_core::{paginate, ListingQuery, Page, Transaction, DEFAULT_PAGE_SIZE};
use reqwest::Method;

use crate::client::{ApiClient, Auth};
use crate::error::{ClientError, ClientResult};

impl ApiClient {
    /// Searches recorded transactions.
    pub async fn search_transactions(&self, query: &ListingQuery) -> ClientResult<Vec<Transaction>> {
        let req = self
            .request(Method::GET, &["transactions", "search"], Auth::Public)?
            .query(&query.to_pairs());
        self.send_json(req, Auth::Public).await
    }

    /// Searches transactions and returns one page of the results.
    pub async fn search_transactions_page(
        &self,
        query: &ListingQuery,
        page: usize,
    ) -> ClientResult<Page<Transaction>> {
        let all = self.search_transactions(query).await?;
        paginate(&all, page, DEFAULT_PAGE_SIZE).map_err(|e| ClientError::invalid_input(e.to_string()))
    }

    /// Suggests project names from transaction records.
    pub async fn suggest_transaction_projects(&self, query: &str) -> ClientResult<Vec<String>> {
        self.suggest(&["transactions", "suggest"], query).await
    }

    /// Fetches one transaction.
    pub async fn transaction(&self, id: i64) -> ClientResult<Transaction> {
        self.get_json(&["transactions", &id.to_string()], Auth::Public)
            .await
    }

    /// Fetches the last five transactions of a project.
    pub async fn last5_transactions(&self, project_name: &str) -> ClientResult<Vec<Transaction>> {
        if project_name.trim().is_empty() {
            return Err(ClientError::invalid_input("project name is empty"));
        }
        self.get_json(&["transactions", project_name, "last5"], Auth::Public)
            .await
    }

    /// Records a transaction.
    pub async fn add_transaction(&self, transaction: &Transaction) -> ClientResult<Transaction> {
        let req = self
            .request(Method::POST, &["transactions", "add"], Auth::Bearer)?
            .json(transaction);
        self.send_json(req, Auth::Bearer).await
    }

    /// Replaces a transaction.
    pub async fn update_transaction(
        &self,
        id: i64,
        transaction: &Transaction,
    ) -> ClientResult<Transaction> {
        let req = self
            .request(Method::PUT, &["transactions", "update", &id.to_string()], Auth::Bearer)?
            .json(transaction);
        self.send_json(req, Auth::Bearer).await
    }

    /// Deletes a transaction.
    pub async fn delete_transaction(&self, id: i64) -> ClientResult<()> {
        let req = self.request(
            Method::DELETE,
            &["transactions", "delete", &id.to_string()],
            Auth::Bearer,
        )?;
        self.send_empty(req, Auth::Bearer).await
    }
}
