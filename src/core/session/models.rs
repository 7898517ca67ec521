//! Request/response bodies and the decoded session payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Claims decoded from the payload segment of the stored token.
///
/// Only `exp` and `iat` are typed; every other claim, including the identity
/// fields, stays in `extra` exactly as issued so a decoded payload serializes
/// back to the same JSON object. Identity accessors read string claims and
/// treat `null` or other JSON types as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Expiration time (Unix seconds, possibly fractional)
    pub exp: Number,
    /// Issued at (Unix seconds, possibly fractional)
    pub iat: Number,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionPayload {
    /// A string claim by name
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(Value::as_str)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.claim_str("first_name")
    }

    pub fn middle_name(&self) -> Option<&str> {
        self.claim_str("middle_name")
    }

    pub fn last_name(&self) -> Option<&str> {
        self.claim_str("last_name")
    }

    pub fn user_type(&self) -> Option<&str> {
        self.claim_str("user_type")
    }

    pub fn email(&self) -> Option<&str> {
        self.claim_str("email")
    }

    /// `exp` as floating-point Unix seconds
    pub fn expires_at(&self) -> f64 {
        self.exp.as_f64().unwrap_or(f64::NAN)
    }

    /// `iat` as floating-point Unix seconds
    pub fn issued_at(&self) -> f64 {
        self.iat.as_f64().unwrap_or(f64::NAN)
    }

    /// Whether the session is still valid at `now` (Unix seconds).
    /// There is no leeway: a session expiring exactly at `now` is expired.
    pub fn is_valid_at(&self, now: f64) -> bool {
        self.expires_at() > now
    }

    /// Whole seconds left until expiry, zero once expired
    pub fn remaining_at(&self, now: f64) -> i64 {
        let remaining = self.expires_at() - now;
        if remaining > 0.0 {
            remaining.floor() as i64
        } else {
            0
        }
    }

    /// Given, middle and family names joined with single spaces, skipping blanks
    pub fn full_name(&self) -> String {
        [self.first_name(), self.middle_name(), self.last_name()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Login request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            id: None,
            user_id: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Account creation request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub user_type: String,
    pub email: String,
    pub password: String,
    pub user_id: String,
}

/// Login response body.
///
/// Only `token` is interpreted; every other field is passed through in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenResponse {
    /// The issued token, if the response carries a non-empty one
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }
}
