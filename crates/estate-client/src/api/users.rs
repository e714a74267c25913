// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Registration, login and profile endpoints.

use estate_core::{LoginRequest, LoginResponse, ProfileUpdate, RegisterRequest, RegisterResponse, Role, UserProfile};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::info;

use crate::client::{ApiClient, Auth};
use crate::error::ClientResult;

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedIn {
    /// Role decoded from the issued token.
    pub role: Role,
    /// Account identifier.
    pub user_id: String,
    /// Server message.
    pub message: Option<String>,
}

impl ApiClient {
    /// Creates an account.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<RegisterResponse> {
        let req = self
            .request(Method::POST, &["users", "register"], Auth::Public)?
            .json(request);
        self.send_json(req, Auth::Public).await
    }

    /// Logs in and establishes the session.
    ///
    /// The issued token is decoded before it is stored; a token the client
    /// cannot read fails the login and leaves any existing session in place.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoggedIn> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let req = self
            .request(Method::POST, &["users", "login"], Auth::Public)?
            .json(&body);
        let response: LoginResponse = self.send_json(req, Auth::Public).await?;

        let role = self.store().login(&response.token, &response.id)?;
        info!(role = %role, user_id = %response.id, "Logged in");

        Ok(LoggedIn {
            role,
            user_id: response.id,
            message: response.message,
        })
    }

    /// Ends the local session. The server keeps no session state.
    pub fn logout(&self) -> ClientResult<()> {
        self.store().logout()?;
        Ok(())
    }

    /// Fetches a user profile.
    pub async fn profile(&self, user_id: &str) -> ClientResult<UserProfile> {
        self.get_json(&["users", user_id], Auth::Bearer).await
    }

    /// Updates a user profile, optionally replacing the picture.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> ClientResult<UserProfile> {
        let mut form = Form::new()
            .text("name", update.name.clone())
            .text("email", update.email.clone())
            .text("phoneNumber", update.phone_number.clone())
            .text("address", update.address.clone());
        if let Some(password) = &update.password {
            form = form.text("password", password.clone());
        }
        if let Some(picture) = &update.profile_picture {
            form = form.part(
                "profilePicture",
                Part::bytes(picture.clone()).file_name("profile-picture"),
            );
        }

        let req = self
            .request(Method::PUT, &["users", user_id], Auth::Bearer)?
            .multipart(form);
        self.send_json(req, Auth::Bearer).await
    }
}
