// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Tokens are HS256-signed with [`TokenFixtures::SECRET`]. The client never
//! checks signatures, but signed tokens keep the fixtures realistic.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use estate_auth::{Clock, MemoryStorage, SessionStorage, StorageError, TOKEN_KEY, USER_ID_KEY};
use estate_core::{Message, Property, Role, Transaction};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

// =============================================================================
// Token Fixtures
// =============================================================================

/// Fixture minting bearer tokens.
pub struct TokenFixtures;

impl TokenFixtures {
    /// Signing secret shared with the stub API.
    pub const SECRET: &'static str = "estate-test-secret-key-with-enough-length";

    /// A token for `role` expiring `ttl_secs` after `now`.
    pub fn token_at(role: Role, now: DateTime<Utc>, ttl_secs: i64) -> String {
        Self::sign(&json!({
            "sub": format!("{}@example.com", role.as_str().to_lowercase()),
            "role": role.as_str(),
            "iat": now.timestamp(),
            "exp": now.timestamp() + ttl_secs,
        }))
    }

    /// A token for `role` valid for one hour.
    pub fn valid(role: Role) -> String {
        Self::token_at(role, Utc::now(), 3600)
    }

    /// A token for `role` that expired one minute ago.
    pub fn expired(role: Role) -> String {
        Self::token_at(role, Utc::now(), -60)
    }

    /// Signs arbitrary claims.
    pub fn sign(claims: &Value) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(Self::SECRET.as_bytes()),
        )
        .expect("Failed to sign token")
    }

    /// Builds an unsigned three-segment token around a raw payload string.
    pub fn with_raw_payload(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    /// Token strings that must never decode.
    pub fn malformed() -> Vec<String> {
        vec![
            String::new(),
            "no-delimiters".to_string(),
            "two.segments".to_string(),
            "a.b.c.d".to_string(),
            "header.!!not-base64!!.sig".to_string(),
            Self::with_raw_payload("not json"),
            Self::with_raw_payload("[1,2,3]"),
            Self::with_raw_payload("\"ADMIN\""),
            Self::with_raw_payload(r#"{"role":"OWNER","exp":4102444800}"#),
            Self::with_raw_payload(r#"{"exp":4102444800}"#),
        ]
    }
}

// =============================================================================
// Clock Fixture
// =============================================================================

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct TestClock {
    millis: Arc<AtomicI64>,
}

impl TestClock {
    /// Starts the clock at `start`.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.timestamp_millis())),
        }
    }

    /// Returns the current instant.
    pub fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst))
            .expect("Clock out of range")
    }

    /// Moves the clock forward.
    pub fn advance_secs(&self, secs: i64) {
        self.millis.fetch_add(secs * 1000, Ordering::SeqCst);
    }

    /// Returns the clock in the form the session store takes.
    pub fn clock(&self) -> Clock {
        let millis = Arc::clone(&self.millis);
        Arc::new(move || {
            DateTime::from_timestamp_millis(millis.load(Ordering::SeqCst)).unwrap_or_default()
        })
    }
}

// =============================================================================
// Storage Fixture
// =============================================================================

/// Memory storage that can be inspected after the store takes it, and made
/// to fail on demand.
#[derive(Debug, Clone, Default)]
pub struct TestStorage {
    inner: Arc<MemoryStorage>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl TestStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage holding a persisted session.
    pub fn with_session(token: &str, user_id: &str) -> Self {
        Self {
            inner: Arc::new(MemoryStorage::with_entries([
                (TOKEN_KEY, token),
                (USER_ID_KEY, user_id),
            ])),
            ..Self::default()
        }
    }

    /// Creates storage holding arbitrary entries.
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            inner: Arc::new(MemoryStorage::with_entries(entries.iter().copied())),
            ..Self::default()
        }
    }

    /// Makes every read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Reads a key, bypassing failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.load(key).ok().flatten()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl SessionStorage for TestStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("reads disabled"));
        }
        self.inner.load(key)
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("writes disabled"));
        }
        self.inner.store(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("writes disabled"));
        }
        self.inner.remove(key)
    }

    fn backend(&self) -> &'static str {
        "test"
    }
}

// =============================================================================
// Listing Fixtures
// =============================================================================

/// Fixture providing listing data.
pub struct ListingFixtures;

impl ListingFixtures {
    /// Project names used across fixtures.
    pub const PROJECTS: [&'static str; 4] = ["Sky Tower", "Skyline Residences", "Harbour View", "Palm Court"];

    /// A listing with the given id.
    pub fn property(id: i64) -> Property {
        let project = Self::PROJECTS[(id as usize) % Self::PROJECTS.len()];
        Property {
            id: Some(id),
            size_sq_ft: format!("{}", 800 + id * 10),
            property_type: if id % 2 == 0 { "Condominium" } else { "Terrace" }.to_string(),
            no_of_floors: 1 + (id % 3) as i32,
            address: format!("{id} Example Road"),
            project_name: project.to_string(),
            price: 500_000.0 + id as f64 * 1_000.0,
            year: 2000 + (id % 20) as i32,
            price_per_sqft: 600.0,
            facilities: "Pool, Gym".to_string(),
            date_of_valuation: None,
        }
    }

    /// `count` listings with ids `1..=count`.
    pub fn properties(count: i64) -> Vec<Property> {
        (1..=count).map(Self::property).collect()
    }

    /// A transaction for `project`.
    pub fn transaction(id: i64, project: &str) -> Transaction {
        Transaction {
            id: Some(id),
            project_name: project.to_string(),
            property_type: "Condominium".to_string(),
            price: 700_000.0 + id as f64,
            year: 2020,
            ..Transaction::default()
        }
    }

    /// Messages with timestamps out of order; one has no timestamp.
    pub fn messages() -> Vec<Message> {
        let at = |s: &str| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok();
        let message = |id: i64, sender: &str, timestamp| Message {
            id,
            sender: sender.to_string(),
            recipient: "buyer@example.com".to_string(),
            subject: format!("Subject {id}"),
            content: format!("Body of message {id}"),
            timestamp,
        };
        vec![
            message(1, "agent@example.com", at("2024-03-01 09:00:00")),
            message(2, "agent@example.com", None),
            message(3, "other@example.com", at("2024-05-10 18:30:00")),
            message(4, "agent@example.com", at("2024-04-02 12:00:00")),
        ]
    }
}
