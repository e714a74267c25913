// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP plumbing shared by every endpoint group.

use std::sync::Arc;
use std::time::Duration;

use estate_auth::SessionStore;
use estate_config::ApiConfig;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Whether a request carries the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    /// Sent without credentials.
    Public,
    /// Requires a session; fails with `NotAuthenticated` when there is none.
    Bearer,
}

/// Client for the listing API.
///
/// Cheap to clone; clones share the HTTP connection pool and the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<SessionStore>,
    logout_on_auth_failure: bool,
}

impl ApiClient {
    /// Creates a client for the server at `base_url` (without `/api`).
    pub fn new(base_url: &str, store: Arc<SessionStore>) -> ClientResult<Self> {
        Self::build(base_url, store, Duration::from_secs(30), None)
    }

    /// Creates a client from the `api` configuration section.
    pub fn from_config(config: &ApiConfig, store: Arc<SessionStore>) -> ClientResult<Self> {
        let client = Self::build(
            &config.base_url,
            store,
            config.timeout(),
            config.user_agent.as_deref(),
        )?;
        Ok(client.with_logout_on_auth_failure(config.logout_on_auth_failure))
    }

    fn build(
        base_url: &str,
        store: Arc<SessionStore>,
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> ClientResult<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ClientError::invalid_input(format!("invalid base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::invalid_input(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }

        let user_agent = user_agent
            .map(str::to_string)
            .unwrap_or_else(|| format!("estate/{}", crate::VERSION));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            http,
            base_url,
            store,
            logout_on_auth_failure: true,
        })
    }

    /// Sets whether a 401/403 answer ends the session.
    pub fn with_logout_on_auth_failure(mut self, enabled: bool) -> Self {
        self.logout_on_auth_failure = enabled;
        self
    }

    /// Returns the session store.
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Returns the server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// Builds `<base>/api/<segments...>`, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::invalid_input("base URL cannot carry a path"))?;
            path.pop_if_empty().push("api").extend(segments);
        }
        Ok(url)
    }

    pub(crate) fn request(
        &self,
        method: Method,
        segments: &[&str],
        auth: Auth,
    ) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        let mut request = self.http.request(method, url);

        if auth == Auth::Bearer {
            let header = self.store.bearer_header().ok_or(ClientError::NotAuthenticated)?;
            request = request.header(AUTHORIZATION, header);
        }
        Ok(request)
    }

    /// Sends a request and maps error statuses.
    pub(crate) async fn send(&self, request: RequestBuilder, auth: Auth) -> ClientResult<Response> {
        let request = request.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let sent_token = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        let response = self.http.execute(request).await?;
        let status = response.status();
        debug!(method = %method, path = %path, status = status.as_u16(), "API response");

        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(status, &response.text().await.unwrap_or_default());

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            // Only the session that sent the token may be ended by the answer.
            if let (Auth::Bearer, true, Some(sent)) =
                (auth, self.logout_on_auth_failure, sent_token.as_deref())
            {
                match self.store.logout_if_token(sent) {
                    Ok(true) => {
                        warn!(status = status.as_u16(), path = %path, "Server rejected session, logged out")
                    }
                    Ok(false) => {}
                    Err(e) => warn!(error = %e, "Failed to clear session after auth failure"),
                }
            }
            return Err(ClientError::unauthorized(status.as_u16(), message));
        }

        Err(ClientError::api(status.as_u16(), message))
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        auth: Auth,
    ) -> ClientResult<T> {
        let response = self.send(request, auth).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::decode(e.to_string()))
    }

    /// Sends a request whose response body is not needed.
    pub(crate) async fn send_empty(&self, request: RequestBuilder, auth: Auth) -> ClientResult<()> {
        self.send(request, auth).await?;
        Ok(())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        auth: Auth,
    ) -> ClientResult<T> {
        let request = self.request(Method::GET, segments, auth)?;
        self.send_json(request, auth).await
    }
}

/// Extracts a human-readable message from an error body.
///
/// Prefers `{"error": ..}`, then `{"message": ..}`, then the raw text, then
/// the status reason.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }

    let text = body.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
