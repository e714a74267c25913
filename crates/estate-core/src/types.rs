// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Payload models of the listing API.
//!
//! Field names follow the server's JSON (camelCase). Unknown fields are
//! ignored so that server-side additions do not break the client.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::Role;

// =============================================================================
// Listings
// =============================================================================

/// A property listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Server-assigned identifier; absent on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Floor area in square feet, as entered by the agent.
    #[serde(default)]
    pub size_sq_ft: String,
    /// Property type (condominium, terrace, ...).
    #[serde(default)]
    pub property_type: String,
    /// Number of floors.
    #[serde(default)]
    pub no_of_floors: i32,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Development or project name.
    #[serde(default)]
    pub project_name: String,
    /// Asking price.
    #[serde(default)]
    pub price: f64,
    /// Year of completion.
    #[serde(default)]
    pub year: i32,
    /// Price per square foot.
    #[serde(default)]
    pub price_per_sqft: f64,
    /// Free-form facilities list.
    #[serde(default)]
    pub facilities: String,
    /// Valuation date.
    #[serde(default, with = "epoch_or_rfc3339", skip_serializing_if = "Option::is_none")]
    pub date_of_valuation: Option<DateTime<Utc>>,
}

/// A recorded sale transaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Server-assigned identifier; absent on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Property the sale refers to, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<i64>,
    /// Floor area in square feet.
    #[serde(default)]
    pub size_sq_ft: String,
    /// Property type.
    #[serde(default)]
    pub property_type: String,
    /// Number of floors.
    #[serde(default)]
    pub no_of_floors: i32,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Development or project name.
    #[serde(default)]
    pub project_name: String,
    /// Sale price.
    #[serde(default)]
    pub price: f64,
    /// Year of the sale.
    #[serde(default)]
    pub year: i32,
    /// Price per square foot.
    #[serde(default)]
    pub price_per_sqft: f64,
    /// Free-form facilities list.
    #[serde(default)]
    pub facilities: String,
    /// Valuation date.
    #[serde(default, with = "epoch_or_rfc3339", skip_serializing_if = "Option::is_none")]
    pub date_of_valuation: Option<DateTime<Utc>>,
}

/// Search filters shared by property and transaction search.
///
/// Empty fields are left out of the query string.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    /// Project name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Property type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Floor area.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_sq_ft: Option<String>,
    /// Number of floors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_of_floors: Option<i32>,
    /// Address fragment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Lower price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    /// Upper price bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// Year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Lower price-per-square-foot bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price_per_sqft: Option<f64>,
    /// Upper price-per-square-foot bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price_per_sqft: Option<f64>,
    /// Facilities fragment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facilities: Option<String>,
}

impl ListingQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project name filter.
    pub fn project_name(mut self, value: impl Into<String>) -> Self {
        self.project_name = non_blank(value.into());
        self
    }

    /// Sets the property type filter.
    pub fn property_type(mut self, value: impl Into<String>) -> Self {
        self.property_type = non_blank(value.into());
        self
    }

    /// Sets the price range.
    pub fn price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    /// Sets the year filter.
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Sets the facilities filter.
    pub fn facilities(mut self, value: impl Into<String>) -> Self {
        self.facilities = non_blank(value.into());
        self
    }

    /// Returns the filters as query-string pairs, skipping empty ones.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(v) = value.and_then(non_blank) {
                pairs.push((key, v));
            }
        };

        push("projectName", self.project_name.clone());
        push("propertyType", self.property_type.clone());
        push("sizeSqFt", self.size_sq_ft.clone());
        push("noOfFloors", self.no_of_floors.map(|v| v.to_string()));
        push("address", self.address.clone());
        push("minPrice", self.min_price.map(|v| v.to_string()));
        push("maxPrice", self.max_price.map(|v| v.to_string()));
        push("year", self.year.map(|v| v.to_string()));
        push("minPricePerSqft", self.min_price_per_sqft.map(|v| v.to_string()));
        push("maxPricePerSqft", self.max_price_per_sqft.map(|v| v.to_string()));
        push("facilities", self.facilities.clone());
        pairs
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account e-mail.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token.
    pub token: String,
    /// Account identifier.
    #[serde(with = "string_or_number")]
    pub id: String,
    /// Server message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Self-service registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name.
    pub name: String,
    /// Account e-mail.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// Requested role.
    pub role: Role,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Registration response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Server message.
    #[serde(default)]
    pub message: String,
    /// New account identifier.
    #[serde(with = "string_or_number")]
    pub id: String,
}

/// A user account as returned by the profile and admin endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Account identifier.
    pub id: i64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Account e-mail.
    #[serde(default)]
    pub email: String,
    /// Account role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Registration time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_registration: Option<NaiveDateTime>,
    /// Last successful login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<NaiveDateTime>,
}

/// Profile fields submitted by the profile page.
///
/// Sent as multipart form data, so this type is not serialized with serde.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// Display name.
    pub name: String,
    /// Account e-mail.
    pub email: String,
    /// Phone number.
    pub phone_number: String,
    /// Postal address.
    pub address: String,
    /// New password, when changing it.
    pub password: Option<String>,
    /// New profile picture bytes.
    pub profile_picture: Option<Vec<u8>>,
}

/// Account fields managed by administrators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRequest {
    /// Display name.
    pub name: String,
    /// Account e-mail.
    pub email: String,
    /// Account role.
    pub role: Role,
    /// Password; required on creation, optional on update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// =============================================================================
// Messages
// =============================================================================

/// An in-app message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message identifier.
    pub id: i64,
    /// Sender e-mail.
    #[serde(default)]
    pub sender: String,
    /// Recipient e-mail.
    #[serde(default)]
    pub recipient: String,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Body.
    #[serde(default)]
    pub content: String,
    /// Send time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
}

impl Message {
    /// Returns the first `max_chars` characters of the body.
    pub fn snippet(&self, max_chars: usize) -> String {
        self.content.chars().take(max_chars).collect()
    }
}

/// A message being composed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    /// Recipient e-mail.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Body.
    pub content: String,
}

/// Sorts messages newest first; messages without a timestamp sort last.
pub fn sort_newest_first(messages: &mut [Message]) {
    messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

// =============================================================================
// Field Serialization
// =============================================================================

/// Account ids arrive as JSON numbers from some endpoints and strings from
/// others; the client keeps them as strings.
mod string_or_number {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    pub fn serialize<S>(value: &str, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => n.to_string(),
            Raw::Text(s) => s,
        })
    }
}

/// Dates arrive either as epoch milliseconds or as RFC 3339 strings.
mod epoch_or_rfc3339 {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_i64(dt.timestamp_millis()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Millis(ms)) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", ms))),
            Some(Raw::Text(s)) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
