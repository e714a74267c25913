// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! A stub of the listing API, served by axum on `127.0.0.1:0`.
//!
//! Accounts are keyed by e-mail prefix: `admin@`, `agent@` and `buyer@`
//! log in with their role; `broken@` receives a token the client cannot
//! decode. The password `wrong` is always rejected. Every request is
//! recorded so tests can assert on what reached the wire.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use estate_auth::{decode, MemoryStorage, SessionStore};
use estate_client::ApiClient;
use estate_core::Role;
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::fixtures::{ListingFixtures, TokenFixtures};

/// Number of listings the stub search returns without filters.
pub const STUB_PROPERTY_COUNT: i64 = 20;

// =============================================================================
// Recorded Requests
// =============================================================================

/// A request as the stub received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Path including the `/api` prefix.
    pub path: String,
    /// Raw query string.
    pub query: Option<String>,
    /// `Authorization` header value.
    pub authorization: Option<String>,
}

/// Shared state of the stub server.
#[derive(Debug, Default)]
pub struct StubState {
    requests: Mutex<Vec<RecordedRequest>>,
    reject_sessions: AtomicBool,
    hold_responses: AtomicBool,
    release: Notify,
}

impl StubState {
    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Returns the requests whose path equals `path`.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    /// Makes every authenticated endpoint answer 401.
    pub fn reject_sessions(&self, reject: bool) {
        self.reject_sessions.store(reject, Ordering::SeqCst);
    }

    /// Makes each request wait for [`release_one`](Self::release_one) after
    /// it has been recorded.
    pub fn hold_responses(&self, hold: bool) {
        self.hold_responses.store(hold, Ordering::SeqCst);
    }

    /// Lets one held request proceed.
    pub fn release_one(&self) {
        self.release.notify_one();
    }
}

// =============================================================================
// Stub Server
// =============================================================================

/// A running stub API. The server stops when this is dropped.
pub struct StubApi {
    addr: SocketAddr,
    state: Arc<StubState>,
    handle: JoinHandle<()>,
}

impl StubApi {
    /// Starts the stub on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(StubState::default());
        let app = router(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub API");
        let addr = listener.local_addr().expect("Failed to read stub address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state, handle }
    }

    /// Base URL of the stub, without `/api`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Server state.
    pub fn state(&self) -> &Arc<StubState> {
        &self.state
    }

    /// A client with an empty in-memory session.
    pub fn client(&self) -> ApiClient {
        let store = Arc::new(SessionStore::restore(MemoryStorage::new()));
        self.client_with(store)
    }

    /// A client sharing the given session.
    pub fn client_with(&self, store: Arc<SessionStore>) -> ApiClient {
        ApiClient::new(&self.base_url(), store).expect("Failed to build client")
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/api/users/login", post(login))
        .route("/api/users/{id}", get(profile))
        .route("/api/properties/search", get(search_properties))
        .route("/api/properties/suggest", get(suggest_projects))
        .route("/api/properties/agent-properties", get(agent_properties))
        .route("/api/properties/delete/{id}", delete(delete_property))
        .route("/api/properties/{id}", get(property))
        .route("/api/transactions/{key}/last5", get(last5))
        .route("/api/favorites", get(favorites))
        .route("/api/messages", get(inbox))
        .route("/api/messages/conversation/{email}", get(conversation))
        .route("/api/admin/users", get(admin_users))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
        .with_state(state)
}

async fn record(State(state): State<Arc<StubState>>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().push(RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        authorization,
    });
    if state.hold_responses.load(Ordering::SeqCst) {
        state.release.notified().await;
    }
    next.run(request).await
}

// =============================================================================
// Handlers
// =============================================================================

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Checks the bearer token and returns its role.
#[allow(clippy::result_large_err)]
fn authenticate(state: &StubState, headers: &HeaderMap) -> Result<Role, Response> {
    if state.reject_sessions.load(Ordering::SeqCst) {
        return Err(error(StatusCode::UNAUTHORIZED, "Session revoked"));
    }
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| error(StatusCode::UNAUTHORIZED, "Missing token"))?;
    decode(token)
        .map(|claims| claims.role)
        .map_err(|_| error(StatusCode::UNAUTHORIZED, "Invalid token"))
}

#[derive(Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn login(Json(credentials): Json<Credentials>) -> Response {
    if credentials.password == "wrong" {
        return error(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    let (local, _) = credentials.email.split_once('@').unwrap_or_default();
    let token = match local {
        "admin" => TokenFixtures::valid(Role::Admin),
        "agent" => TokenFixtures::valid(Role::Agent),
        "buyer" => TokenFixtures::valid(Role::Buyer),
        "broken" => "not-a-token".to_string(),
        _ => return error(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    };
    // Numeric ids, as the server sends them.
    let id = match local {
        "admin" => 1,
        "agent" => 2,
        _ => 3,
    };
    Json(json!({ "token": token, "id": id, "message": "Login successful" })).into_response()
}

async fn profile(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    match authenticate(&state, &headers) {
        Ok(role) => Json(json!({
            "id": id,
            "name": "Test User",
            "email": format!("{}@example.com", role.as_str().to_lowercase()),
            "role": role,
        }))
        .into_response(),
        Err(response) => response,
    }
}

async fn search_properties(Query(params): Query<HashMap<String, String>>) -> Response {
    let mut properties = ListingFixtures::properties(STUB_PROPERTY_COUNT);
    if let Some(project) = params.get("projectName") {
        properties.retain(|p| p.project_name == *project);
    }
    Json(properties).into_response()
}

async fn suggest_projects(Query(params): Query<HashMap<String, String>>) -> Response {
    let query = params.get("query").map(|q| q.to_lowercase()).unwrap_or_default();
    let matches: Vec<&str> = ListingFixtures::PROJECTS
        .iter()
        .copied()
        .filter(|p| p.to_lowercase().contains(&query))
        .collect();
    Json(matches).into_response()
}

async fn agent_properties(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    match authenticate(&state, &headers) {
        Ok(Role::Agent | Role::Admin) => Json(ListingFixtures::properties(2)).into_response(),
        Ok(Role::Buyer) => error(StatusCode::FORBIDDEN, "Agents only"),
        Err(response) => response,
    }
}

async fn delete_property(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
) -> Response {
    match authenticate(&state, &headers) {
        Ok(Role::Agent | Role::Admin) => StatusCode::NO_CONTENT.into_response(),
        Ok(Role::Buyer) => error(StatusCode::FORBIDDEN, "Agents only"),
        Err(response) => response,
    }
}

async fn property(Path(id): Path<i64>) -> Response {
    if id > STUB_PROPERTY_COUNT {
        return error(StatusCode::NOT_FOUND, "Property not found");
    }
    Json(ListingFixtures::property(id)).into_response()
}

async fn last5(Path(key): Path<String>) -> Response {
    let transactions: Vec<_> = (1..=5)
        .map(|id| ListingFixtures::transaction(id, &key))
        .collect();
    Json(transactions).into_response()
}

async fn favorites(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    match authenticate(&state, &headers) {
        Ok(_) => Json(vec![
            ListingFixtures::property(1),
            ListingFixtures::property(5),
            ListingFixtures::property(3),
        ])
        .into_response(),
        Err(response) => response,
    }
}

async fn inbox(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    match authenticate(&state, &headers) {
        Ok(_) => Json(ListingFixtures::messages()).into_response(),
        Err(response) => response,
    }
}

async fn conversation(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Response {
    match authenticate(&state, &headers) {
        Ok(_) => {
            let messages: Vec<_> = ListingFixtures::messages()
                .into_iter()
                .filter(|m| m.sender == email)
                .collect();
            Json(messages).into_response()
        }
        Err(response) => response,
    }
}

async fn admin_users(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    match authenticate(&state, &headers) {
        Ok(Role::Admin) => Json(json!([
            { "id": 1, "name": "Admin", "email": "admin@example.com", "role": "ADMIN" },
            { "id": 2, "name": "Agent", "email": "agent@example.com", "role": "AGENT" },
            { "id": 3, "name": "Buyer", "email": "buyer@example.com", "role": "BUYER" },
            { "id": 4, "name": "Deputy", "email": "deputy@example.com", "role": "ADMIN" },
        ]))
        .into_response(),
        Ok(_) => error(StatusCode::FORBIDDEN, "Admins only"),
        Err(response) => response,
    }
}
