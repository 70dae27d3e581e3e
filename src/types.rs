//! Wire and session types shared by the gateway and the controller.
//!
//! Credentials and tokens redact their secrets in `Debug` output so they can
//! flow through `tracing` fields without leaking.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Body of `POST /login`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /register`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegisterCredentials {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterCredentials {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into(), password: password.into() }
    }

    /// The email/password pair used for the login that follows registration.
    #[must_use]
    pub fn login_credentials(&self) -> LoginCredentials {
        LoginCredentials { email: self.email.clone(), password: self.password.clone() }
    }
}

impl fmt::Debug for RegisterCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCredentials")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// TOKEN
// =============================================================================

/// Opaque bearer token issued by the remote API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Success body of `POST /login`. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: SessionToken,
}

// =============================================================================
// USER
// =============================================================================

/// Authenticated user as returned by `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
