// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Client Integration Tests
//!
//! Runs the API client against the stub listing API.
//!
//! - `test_login_*`: session establishment through the login endpoint
//! - `test_auth_*`: bearer handling and rejected sessions
//! - `test_listing_*`: search, paging and suggestions
//! - `test_account_*`: favorites, messages and admin endpoints

use std::sync::Arc;
use std::time::Duration;

use estate_auth::{Navigator, RouteTable, SessionStore, TOKEN_KEY, USER_ID_KEY};
use estate_client::{ClientError, MIN_SUGGESTION_CHARS};
use estate_core::{ListingQuery, Role, DEFAULT_PAGE_SIZE};
use estate_tests::common::{
    init_test_logging, StubApi, TestStorage, TokenFixtures, STUB_PROPERTY_COUNT,
};

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_establishes_session() {
    init_test_logging();
    let api = StubApi::start().await;
    let storage = TestStorage::new();
    let store = Arc::new(SessionStore::restore(storage.clone()));
    let client = api.client_with(Arc::clone(&store));

    let logged_in = client.login("agent@example.com", "secret").await.unwrap();
    assert_eq!(logged_in.role, Role::Agent);
    assert_eq!(logged_in.user_id, "2");
    assert_eq!(logged_in.message.as_deref(), Some("Login successful"));

    assert_eq!(store.current_role(), Some(Role::Agent));
    assert_eq!(storage.peek(USER_ID_KEY).as_deref(), Some("2"));
    assert!(storage.peek(TOKEN_KEY).is_some());

    let navigator = Navigator::new(Arc::clone(&store), RouteTable::standard());
    assert!(navigator.navigate("/manage-properties").is_allowed());
    assert!(!navigator.navigate("/admin/users").is_allowed());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let api = StubApi::start().await;
    let client = api.client();

    let err = client.login("buyer@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { status: 401, ref message } if message == "Invalid email or password"));
    assert!(!client.store().is_authenticated());
}

#[tokio::test]
async fn test_login_undecodable_token_keeps_previous_session() {
    let api = StubApi::start().await;
    let client = api.client();
    client.login("buyer@example.com", "secret").await.unwrap();

    let err = client.login("broken@example.com", "secret").await.unwrap_err();
    assert!(matches!(err, ClientError::Session(_)));
    assert_eq!(client.store().current_role(), Some(Role::Buyer));
    assert_eq!(client.store().current_user_id().as_deref(), Some("3"));
}

#[tokio::test]
async fn test_login_then_logout() {
    let api = StubApi::start().await;
    let storage = TestStorage::new();
    let client = api.client_with(Arc::new(SessionStore::restore(storage.clone())));

    client.login("buyer@example.com", "secret").await.unwrap();
    client.logout().unwrap();
    client.logout().unwrap();

    assert!(!client.store().is_authenticated());
    assert!(storage.is_empty());
}

// =============================================================================
// Bearer Handling
// =============================================================================

#[tokio::test]
async fn test_auth_bearer_sent_on_protected_calls() {
    let api = StubApi::start().await;
    let client = api.client();
    client.login("buyer@example.com", "secret").await.unwrap();

    client.favorites().await.unwrap();
    let token = client.store().current_token().unwrap();
    let requests = api.state().requests_to("/api/favorites");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization, Some(format!("Bearer {token}")));

    client.property(3).await.unwrap();
    let requests = api.state().requests_to("/api/properties/3");
    assert_eq!(requests[0].authorization, None);
}

#[tokio::test]
async fn test_auth_not_authenticated_sends_nothing() {
    let api = StubApi::start().await;
    let client = api.client();

    let err = client.favorites().await.unwrap_err();
    assert!(matches!(err, ClientError::NotAuthenticated));
    let err = client.admin_users().await.unwrap_err();
    assert!(matches!(err, ClientError::NotAuthenticated));
    assert!(api.state().requests().is_empty());
}

#[tokio::test]
async fn test_auth_rejected_session_logs_out() {
    let api = StubApi::start().await;
    let storage = TestStorage::new();
    let client = api.client_with(Arc::new(SessionStore::restore(storage.clone())));
    client.login("agent@example.com", "secret").await.unwrap();

    api.state().reject_sessions(true);
    let err = client.agent_properties().await.unwrap_err();
    assert!(err.is_auth_failure());
    assert_eq!(err.status(), Some(401));
    assert!(!client.store().is_authenticated());
    assert!(storage.is_empty());

    // The next call fails locally.
    let err = client.agent_properties().await.unwrap_err();
    assert!(matches!(err, ClientError::NotAuthenticated));
}

#[tokio::test]
async fn test_auth_late_rejection_spares_newer_session() {
    let api = StubApi::start().await;
    let client = api.client();
    client.login("agent@example.com", "secret").await.unwrap();

    api.state().reject_sessions(true);
    api.state().hold_responses(true);
    let pending = tokio::spawn({
        let client = client.clone();
        async move { client.agent_properties().await }
    });
    while api
        .state()
        .requests_to("/api/properties/agent-properties")
        .is_empty()
    {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // A newer login lands while the old request is in flight.
    let admin = TokenFixtures::valid(Role::Admin);
    client.store().login(&admin, "1").unwrap();
    api.state().release_one();

    let err = pending.await.unwrap().unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(client.store().current_role(), Some(Role::Admin));
    assert_eq!(client.store().current_token(), Some(admin));
}

#[tokio::test]
async fn test_auth_rejection_kept_when_policy_disabled() {
    let api = StubApi::start().await;
    let client = api.client().with_logout_on_auth_failure(false);
    client.login("buyer@example.com", "secret").await.unwrap();

    let err = client.admin_users().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(client.store().current_role(), Some(Role::Buyer));
}

#[tokio::test]
async fn test_auth_forbidden_logs_out_by_default() {
    let api = StubApi::start().await;
    let client = api.client();
    client.login("buyer@example.com", "secret").await.unwrap();

    let err = client.admin_users().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized { status: 403, .. }));
    assert!(!client.store().is_authenticated());
}

// =============================================================================
// Listings
// =============================================================================

#[tokio::test]
async fn test_listing_search_pages() {
    let api = StubApi::start().await;
    let client = api.client();

    let first = client
        .search_properties_page(&ListingQuery::new(), 1)
        .await
        .unwrap();
    assert_eq!(first.items.len(), DEFAULT_PAGE_SIZE);
    assert_eq!(first.total_items, STUB_PROPERTY_COUNT as usize);
    assert_eq!(first.total_pages, 2);
    assert!(first.has_next());

    let second = client
        .search_properties_page(&ListingQuery::new(), 2)
        .await
        .unwrap();
    assert_eq!(second.items.len(), STUB_PROPERTY_COUNT as usize - DEFAULT_PAGE_SIZE);
    assert!(!second.has_next());
    assert!(second.has_previous());
}

#[tokio::test]
async fn test_listing_search_sends_only_set_filters() {
    let api = StubApi::start().await;
    let client = api.client();

    let query = ListingQuery::new().project_name("Sky Tower").property_type("  ");
    let results = client.search_properties(&query).await.unwrap();
    assert!(results.iter().all(|p| p.project_name == "Sky Tower"));
    assert!(!results.is_empty());

    let requests = api.state().requests_to("/api/properties/search");
    assert_eq!(requests[0].query.as_deref(), Some("projectName=Sky+Tower"));
}

#[tokio::test]
async fn test_listing_suggestions_need_two_characters() {
    let api = StubApi::start().await;
    let client = api.client();
    assert_eq!(MIN_SUGGESTION_CHARS, 2);

    assert!(client.suggest_projects("s").await.unwrap().is_empty());
    assert!(client.suggest_projects(" s ").await.unwrap().is_empty());
    assert!(api.state().requests().is_empty());

    let suggestions = client.suggest_projects("sky").await.unwrap();
    assert_eq!(suggestions, vec!["Sky Tower", "Skyline Residences"]);
}

#[tokio::test]
async fn test_listing_not_found() {
    let api = StubApi::start().await;
    let client = api.client();

    let err = client.property(999).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Property not found"));
}

#[tokio::test]
async fn test_listing_last5_encodes_project() {
    let api = StubApi::start().await;
    let client = api.client();

    let transactions = client.last5_transactions("Sky Tower").await.unwrap();
    assert_eq!(transactions.len(), 5);
    assert!(transactions.iter().all(|t| t.project_name == "Sky Tower"));
    assert_eq!(
        api.state().requests_to("/api/transactions/Sky%20Tower/last5").len(),
        1
    );

    let err = client.last5_transactions("  ").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput { .. }));
}

// =============================================================================
// Account
// =============================================================================

#[tokio::test]
async fn test_account_favorites_sorted_newest_first() {
    let api = StubApi::start().await;
    let client = api.client();
    client.login("buyer@example.com", "secret").await.unwrap();

    let ids: Vec<_> = client
        .favorites()
        .await
        .unwrap()
        .into_iter()
        .filter_map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![5, 3, 1]);
}

#[tokio::test]
async fn test_account_inbox_sorted_by_timestamp() {
    let api = StubApi::start().await;
    let client = api.client();
    client.login("buyer@example.com", "secret").await.unwrap();

    let ids: Vec<_> = client.inbox().await.unwrap().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![3, 4, 1, 2]);

    let conversation = client.conversation("agent@example.com").await.unwrap();
    let ids: Vec<_> = conversation.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![4, 1, 2]);
}

#[tokio::test]
async fn test_account_admin_users_hide_admins() {
    let api = StubApi::start().await;
    let client = api.client();
    client.login("admin@example.com", "secret").await.unwrap();

    let users = client.admin_users().await.unwrap();
    let ids: Vec<_> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert!(users.iter().all(|u| u.role != Some(Role::Admin)));
    assert_eq!(api.state().requests_to("/api/admin/users").len(), 1);
}

#[tokio::test]
async fn test_account_agent_deletes_property() {
    let api = StubApi::start().await;
    let client = api.client();
    client.login("agent@example.com", "secret").await.unwrap();

    client.delete_property(4).await.unwrap();
    let requests = api.state().requests_to("/api/properties/delete/4");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "DELETE");
}
