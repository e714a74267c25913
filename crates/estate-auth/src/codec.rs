// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer-token codec.
//!
//! Tokens are JWT compact serializations: `header.payload.signature`. Only
//! the payload is read. The signature is not verified because the client
//! holds no key.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use estate_core::Role;

/// Payload segments are base64url; padding is accepted but not required.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    NO_PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const SEGMENT_COUNT: usize = 3;

// =============================================================================
// DecodeError
// =============================================================================

/// Failure to recover claims from a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The token is not three dot-separated segments.
    #[error("Malformed token: expected {SEGMENT_COUNT} segments, found {segments}")]
    Malformed {
        /// Number of segments found.
        segments: usize,
    },

    /// The payload segment is not valid base64.
    #[error("Invalid payload encoding: {source}")]
    Encoding {
        /// Underlying base64 error.
        #[from]
        source: base64::DecodeError,
    },

    /// The payload is not a JSON object.
    #[error("Payload is not a structured record: {message}")]
    Payload {
        /// Parser message.
        message: String,
    },

    /// The payload is a record but its claims are unusable.
    #[error("Invalid claims: {message}")]
    Claims {
        /// Parser message.
        message: String,
    },
}

impl DecodeError {
    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            DecodeError::Malformed { .. } => "malformed",
            DecodeError::Encoding { .. } => "encoding",
            DecodeError::Payload { .. } => "payload",
            DecodeError::Claims { .. } => "claims",
        }
    }
}

// =============================================================================
// Claims
// =============================================================================

/// Claims carried in a bearer token.
///
/// Only `role` is required. Claims the client does not use are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account role.
    pub role: Role,

    /// Expiration time (epoch seconds). Absent means the token never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,

    /// Subject, the account e-mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Account identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Issued at time (epoch seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<f64>,
}

impl Claims {
    /// Creates claims carrying only a role.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            exp: None,
            sub: None,
            id: None,
            iat: None,
        }
    }

    /// Sets the expiration time.
    pub fn with_exp(mut self, exp: i64) -> Self {
        self.exp = Some(exp as f64);
        self
    }

    /// Returns `true` if the claims have expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        is_expired(self, now)
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp
            .and_then(|exp| DateTime::from_timestamp_millis((exp * 1000.0) as i64))
    }

    /// Returns the time remaining until expiration at `now`.
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        let remaining = self.expires_at()? - now;
        remaining.to_std().ok()
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Decodes a bearer token into its claims.
///
/// Fails when the token is not three dot-separated segments, when the middle
/// segment is not base64, or when it does not hold a JSON object with a valid
/// `role`. Callers must treat any failure as "not authenticated".
pub fn decode(token: &str) -> Result<Claims, DecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != SEGMENT_COUNT {
        return Err(DecodeError::Malformed {
            segments: segments.len(),
        });
    }

    // Tolerate the standard alphabet some issuers emit.
    let payload = segments[1].replace('+', "-").replace('/', "_");
    let bytes = PAYLOAD_ENGINE.decode(payload.as_bytes())?;

    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Payload {
            message: e.to_string(),
        })?;
    if !value.is_object() {
        return Err(DecodeError::Payload {
            message: format!("expected a JSON object, found {}", json_kind(&value)),
        });
    }

    serde_json::from_value(value).map_err(|e| DecodeError::Claims {
        message: e.to_string(),
    })
}

/// Returns `true` iff `claims.exp` is present and strictly before `now`.
pub fn is_expired(claims: &Claims, now: DateTime<Utc>) -> bool {
    match claims.exp {
        Some(exp) => exp < now.timestamp_millis() as f64 / 1000.0,
        None => false,
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn unsigned(payload: &str) -> String {
        format!("eyJhbGciOiJub25lIn0.{}.", PAYLOAD_ENGINE.encode(payload))
    }

    #[test]
    fn test_decode_signed_token() {
        let claims = serde_json::json!({
            "sub": "agent@example.com",
            "role": "AGENT",
            "id": "42",
            "iat": 1_700_000_000,
            "exp": 1_700_003_600,
        });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap();

        let decoded = decode(&token).unwrap();
        assert_eq!(decoded.role, Role::Agent);
        assert_eq!(decoded.sub.as_deref(), Some("agent@example.com"));
        assert_eq!(decoded.id.as_deref(), Some("42"));
        assert_eq!(decoded.exp, Some(1_700_003_600.0));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        assert_eq!(decode("no-dots"), Err(DecodeError::Malformed { segments: 1 }));
        assert_eq!(decode("a.b"), Err(DecodeError::Malformed { segments: 2 }));
        assert_eq!(decode("a.b.c.d"), Err(DecodeError::Malformed { segments: 4 }));
        assert_eq!(decode(""), Err(DecodeError::Malformed { segments: 1 }));
    }

    #[test]
    fn test_decode_rejects_bad_encoding() {
        let err = decode("header.%%%not-base64%%%.sig").unwrap_err();
        assert_eq!(err.error_type(), "encoding");
    }

    #[test]
    fn test_decode_rejects_non_record_payload() {
        assert_eq!(decode(&unsigned("not json")).unwrap_err().error_type(), "payload");
        assert_eq!(decode(&unsigned("[1,2,3]")).unwrap_err().error_type(), "payload");
        assert_eq!(decode(&unsigned("\"ADMIN\"")).unwrap_err().error_type(), "payload");
        assert_eq!(decode("h..s").unwrap_err().error_type(), "payload");
    }

    #[test]
    fn test_decode_rejects_missing_or_unknown_role() {
        assert_eq!(decode(&unsigned(r#"{"sub":"x"}"#)).unwrap_err().error_type(), "claims");
        assert_eq!(
            decode(&unsigned(r#"{"role":"OWNER"}"#)).unwrap_err().error_type(),
            "claims"
        );
    }

    #[test]
    fn test_decode_accepts_padded_and_standard_alphabet() {
        let padded = base64::engine::general_purpose::STANDARD.encode(r#"{"role":"BUYER"}"#);
        let token = format!("h.{}.s", padded);
        assert_eq!(decode(&token).unwrap().role, Role::Buyer);
    }

    #[test]
    fn test_is_expired() {
        let now = Utc::now();
        let past = Claims::new(Role::Admin).with_exp((now - Duration::seconds(10)).timestamp());
        let future = Claims::new(Role::Admin).with_exp((now + Duration::hours(1)).timestamp());
        let never = Claims::new(Role::Admin);

        assert!(is_expired(&past, now));
        assert!(!is_expired(&future, now));
        assert!(!is_expired(&never, now));
        assert!(future.time_until_expiration(now).is_some());
        assert!(past.time_until_expiration(now).is_none());
    }

    #[test]
    fn test_is_expired_is_strict() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = Claims::new(Role::Buyer).with_exp(1_700_000_000);
        assert!(!is_expired(&claims, now));
        assert!(is_expired(&claims, now + Duration::milliseconds(1)));
    }

    #[test]
    fn test_fractional_exp() {
        let claims = decode(&unsigned(r#"{"role":"ADMIN","exp":1700000000.5}"#)).unwrap();
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert!(!is_expired(&claims, now));
        assert!(is_expired(&claims, now + Duration::seconds(1)));
    }
}
