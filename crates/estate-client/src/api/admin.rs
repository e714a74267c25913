// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account administration.

use estate_core::{AdminUserRequest, Role, UserProfile};
use reqwest::Method;

use crate::client::{ApiClient, Auth};
use crate::error::{ClientError, ClientResult};

impl ApiClient {
    /// Lists the accounts an administrator manages. ADMIN accounts are left
    /// out, so they are never offered for deletion.
    pub async fn admin_users(&self) -> ClientResult<Vec<UserProfile>> {
        let mut users: Vec<UserProfile> = self.get_json(&["admin", "users"], Auth::Bearer).await?;
        users.retain(|user| user.role != Some(Role::Admin));
        Ok(users)
    }

    /// Fetches one account.
    pub async fn admin_user(&self, id: i64) -> ClientResult<UserProfile> {
        self.get_json(&["admin", "users", &id.to_string()], Auth::Bearer)
            .await
    }

    /// Creates an account. A password is required.
    pub async fn admin_create_user(&self, request: &AdminUserRequest) -> ClientResult<UserProfile> {
        if request.password.as_deref().map_or(true, str::is_empty) {
            return Err(ClientError::invalid_input("a password is required for new accounts"));
        }
        let req = self
            .request(Method::POST, &["admin", "users"], Auth::Bearer)?
            .json(request);
        self.send_json(req, Auth::Bearer).await
    }

    /// Updates an account. Omitting the password keeps the current one.
    pub async fn admin_update_user(
        &self,
        id: i64,
        request: &AdminUserRequest,
    ) -> ClientResult<UserProfile> {
        let req = self
            .request(Method::PUT, &["admin", "users", &id.to_string()], Auth::Bearer)?
            .json(request);
        self.send_json(req, Auth::Bearer).await
    }

    /// Deletes an account.
    pub async fn admin_delete_user(&self, id: i64) -> ClientResult<()> {
        let req = self.request(Method::DELETE, &["admin", "users", &id.to_string()], Auth::Bearer)?;
        self.send_empty(req, Auth::Bearer).await
    }
}
