// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Session Integration Tests
//!
//! - `test_restore_*`: startup restore from persisted storage
//! - `test_login_*` / `test_logout_*`: session lifecycle and persistence
//! - `test_expiry_*`: expiry observed after login
//! - `test_concurrent_*`: readers racing writers

use std::sync::Arc;
use std::thread;

use chrono::Utc;
use estate_auth::{
    authorize, decode, ClearReason, Decision, FileStorage, RestoreOutcome, Session,
    SessionError, SessionStore, TOKEN_KEY, USER_ID_KEY,
};
use estate_core::{Role, RoleSet};
use estate_tests::common::{init_test_logging, temp_test_dir, TestClock, TestStorage, TokenFixtures};

// =============================================================================
// Restore
// =============================================================================

#[test]
fn test_restore_admin_session() {
    init_test_logging();
    let storage = TestStorage::with_session(&TokenFixtures::valid(Role::Admin), "u1");

    let store = SessionStore::restore(storage);
    assert_eq!(store.restore_outcome(), RestoreOutcome::Restored { role: Role::Admin });
    assert_eq!(store.current_role(), Some(Role::Admin));

    let role = store.current_role();
    assert_eq!(authorize(role, &RoleSet::of(&[Role::Admin]), "/"), Decision::Allow);
    assert_eq!(
        authorize(role, &RoleSet::of(&[Role::Agent]), "/"),
        Decision::Redirect("/".to_string())
    );
}

#[test]
fn test_restore_empty_storage() {
    let store = SessionStore::restore(TestStorage::new());
    assert_eq!(store.restore_outcome(), RestoreOutcome::Empty);
    assert_eq!(store.current_role(), None);
    assert_eq!(store.snapshot(), Session::empty());
    assert_eq!(
        authorize(store.current_role(), &RoleSet::of(&[Role::Admin]), "/"),
        Decision::Redirect("/".to_string())
    );
}

#[test]
fn test_restore_clears_expired_token() {
    for role in Role::all() {
        let storage = TestStorage::with_session(&TokenFixtures::expired(*role), "u1");
        let store = SessionStore::restore(storage.clone());

        assert_eq!(store.restore_outcome(), RestoreOutcome::Cleared(ClearReason::Expired));
        assert_eq!(store.current_role(), None);
        assert_eq!(storage.peek(TOKEN_KEY), None);
        assert_eq!(storage.peek(USER_ID_KEY), None);
    }
}

#[test]
fn test_restore_clears_malformed_token() {
    for token in TokenFixtures::malformed().into_iter().filter(|t| !t.is_empty()) {
        let storage = TestStorage::with_session(&token, "u1");
        let store = SessionStore::restore(storage.clone());

        assert_eq!(
            store.restore_outcome(),
            RestoreOutcome::Cleared(ClearReason::Invalid),
            "token {token:?}"
        );
        assert!(storage.is_empty(), "token {token:?} left storage behind");
    }
}

#[test]
fn test_restore_clears_incomplete_session() {
    let token = TokenFixtures::valid(Role::Buyer);
    let storage = TestStorage::with_entries(&[(TOKEN_KEY, token.as_str())]);
    let store = SessionStore::restore(storage.clone());

    assert_eq!(store.restore_outcome(), RestoreOutcome::Cleared(ClearReason::Incomplete));
    assert!(!store.is_authenticated());
    assert!(storage.is_empty());

    let storage = TestStorage::with_entries(&[(USER_ID_KEY, "u1")]);
    let store = SessionStore::restore(storage.clone());
    assert_eq!(store.restore_outcome(), RestoreOutcome::Cleared(ClearReason::Incomplete));
    assert!(storage.is_empty());
}

#[test]
fn test_restore_unreadable_storage_starts_logged_out() {
    let storage = TestStorage::with_session(&TokenFixtures::valid(Role::Agent), "u1");
    storage.fail_reads(true);

    let store = SessionStore::restore(storage.clone());
    assert_eq!(store.restore_outcome(), RestoreOutcome::Unavailable);
    assert_eq!(store.current_role(), None);

    // Nothing was deleted; a later restore can still pick it up.
    storage.fail_reads(false);
    let store = SessionStore::restore(storage);
    assert_eq!(store.current_role(), Some(Role::Agent));
}

#[test]
fn test_restore_from_file_across_restarts() {
    init_test_logging();
    let dir = temp_test_dir("estate-session");
    let path = dir.path().join("session.json");

    let store = SessionStore::restore(FileStorage::new(&path));
    assert_eq!(store.restore_outcome(), RestoreOutcome::Empty);
    store.login(&TokenFixtures::valid(Role::Agent), "agent-7").unwrap();
    drop(store);

    let store = SessionStore::restore(FileStorage::new(&path));
    assert_eq!(store.restore_outcome(), RestoreOutcome::Restored { role: Role::Agent });
    assert_eq!(store.current_user_id().as_deref(), Some("agent-7"));

    store.logout().unwrap();
    drop(store);

    let store = SessionStore::restore(FileStorage::new(&path));
    assert_eq!(store.restore_outcome(), RestoreOutcome::Empty);
}

#[cfg(unix)]
#[test]
fn test_session_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = temp_test_dir("estate-session-mode");
    let path = dir.path().join("session.json");
    let store = SessionStore::restore(FileStorage::new(&path));
    store.login(&TokenFixtures::valid(Role::Buyer), "u1").unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

// =============================================================================
// Login / Logout
// =============================================================================

#[test]
fn test_login_then_logout() {
    let storage = TestStorage::new();
    let store = SessionStore::restore(storage.clone());

    let token = TokenFixtures::valid(Role::Buyer);
    assert_eq!(store.login(&token, "u123").unwrap(), Role::Buyer);
    assert_eq!(store.current_user_id().as_deref(), Some("u123"));
    assert_eq!(store.current_role(), Some(Role::Buyer));
    assert_eq!(storage.peek(TOKEN_KEY).as_deref(), Some(token.as_str()));
    assert_eq!(storage.peek(USER_ID_KEY).as_deref(), Some("u123"));
    assert_eq!(store.bearer_header(), Some(format!("Bearer {token}")));

    store.logout().unwrap();
    assert_eq!(store.current_user_id(), None);
    assert_eq!(store.current_role(), None);
    assert!(storage.is_empty());
}

#[test]
fn test_logout_is_idempotent() {
    let store = SessionStore::restore(TestStorage::new());
    store.login(&TokenFixtures::valid(Role::Admin), "u1").unwrap();

    store.logout().unwrap();
    let once = store.snapshot();
    store.logout().unwrap();
    assert_eq!(store.snapshot(), once);
    assert_eq!(once, Session::empty());
}

#[test]
fn test_login_rejects_malformed_tokens() {
    let storage = TestStorage::new();
    let store = SessionStore::restore(storage.clone());
    let valid = TokenFixtures::valid(Role::Agent);
    store.login(&valid, "agent-1").unwrap();
    let before = store.snapshot();

    for token in TokenFixtures::malformed() {
        assert!(decode(&token).is_err(), "token {token:?} decoded");
        let err = store.login(&token, "intruder").unwrap_err();
        assert!(matches!(err, SessionError::Decode(_)), "token {token:?}: {err}");
        assert_eq!(store.snapshot(), before);
        assert_eq!(storage.peek(TOKEN_KEY).as_deref(), Some(valid.as_str()));
        assert_eq!(storage.peek(USER_ID_KEY).as_deref(), Some("agent-1"));
    }
}

#[test]
fn test_login_rejects_expired_token() {
    let store = SessionStore::restore(TestStorage::new());
    let err = store.login(&TokenFixtures::expired(Role::Admin), "u1").unwrap_err();
    assert!(matches!(err, SessionError::Expired));
    assert!(!store.is_authenticated());
}

#[test]
fn test_login_storage_failure_changes_nothing() {
    let storage = TestStorage::new();
    let store = SessionStore::restore(storage.clone());
    let first = TokenFixtures::valid(Role::Buyer);
    store.login(&first, "buyer-1").unwrap();

    storage.fail_writes(true);
    let err = store.login(&TokenFixtures::valid(Role::Admin), "admin-1").unwrap_err();
    assert!(err.is_unavailable());
    assert_eq!(store.current_role(), Some(Role::Buyer));
    assert_eq!(store.current_user_id().as_deref(), Some("buyer-1"));

    storage.fail_writes(false);
    assert_eq!(storage.peek(TOKEN_KEY).as_deref(), Some(first.as_str()));
    assert_eq!(storage.peek(USER_ID_KEY).as_deref(), Some("buyer-1"));
}

#[test]
fn test_logout_clears_memory_even_when_storage_fails() {
    let storage = TestStorage::new();
    let store = SessionStore::restore(storage.clone());
    store.login(&TokenFixtures::valid(Role::Admin), "u1").unwrap();

    storage.fail_writes(true);
    assert!(store.logout().is_err());
    assert!(!store.is_authenticated());
    assert_eq!(store.current_role(), None);
}

// =============================================================================
// Expiry
// =============================================================================

#[test]
fn test_expiry_after_login() {
    let clock = TestClock::starting_at(Utc::now());
    let storage = TestStorage::new();
    let store = SessionStore::restore_with_clock(storage.clone(), clock.clock());

    let token = TokenFixtures::token_at(Role::Agent, clock.now(), 60);
    store.login(&token, "agent-1").unwrap();
    assert_eq!(store.current_role(), Some(Role::Agent));

    clock.advance_secs(59);
    assert_eq!(store.current_role(), Some(Role::Agent));

    clock.advance_secs(2);
    assert_eq!(store.current_role(), None);
    assert_eq!(store.bearer_header(), None);
    // Reads never write.
    assert!(!storage.is_empty());

    assert!(store.enforce_expiry());
    assert!(storage.is_empty());
    assert!(!store.enforce_expiry());
}

#[test]
fn test_expiry_token_without_exp_never_expires() {
    let clock = TestClock::starting_at(Utc::now());
    let store = SessionStore::restore_with_clock(TestStorage::new(), clock.clock());
    let token = TokenFixtures::sign(&serde_json::json!({ "role": "BUYER" }));

    store.login(&token, "u1").unwrap();
    clock.advance_secs(10 * 365 * 24 * 3600);
    assert_eq!(store.current_role(), Some(Role::Buyer));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_readers_see_whole_sessions() {
    let store = Arc::new(SessionStore::restore(TestStorage::new()));
    let admin = TokenFixtures::valid(Role::Admin);
    let buyer = TokenFixtures::valid(Role::Buyer);

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..200 {
                if i % 3 == 0 {
                    store.logout().unwrap();
                } else if i % 2 == 0 {
                    store.login(&admin, "admin-1").unwrap();
                } else {
                    store.login(&buyer, "buyer-1").unwrap();
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..500 {
                    let session = store.snapshot();
                    match (session.role, session.user_id.as_deref()) {
                        (None, None) => assert!(session.token.is_none()),
                        (Some(Role::Admin), Some("admin-1")) => {}
                        (Some(Role::Buyer), Some("buyer-1")) => {}
                        other => panic!("torn session: {other:?}"),
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
