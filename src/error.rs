//! Error taxonomy for the auth client.
//!
//! DESIGN
//! ======
//! `AuthError` is the single typed result at the gateway/controller
//! boundary. The controller drops errors in exactly two places: stale-token
//! recovery during initialization and the remote half of logout. Everywhere
//! else they propagate to the caller.

/// Errors produced by gateway calls and controller operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The API refused the login credentials.
    #[error("{}", .message.as_deref().unwrap_or("login rejected"))]
    AuthRejected { message: Option<String> },

    /// The API refused the registration input (duplicate email, weak password).
    #[error("{}", .message.as_deref().unwrap_or("registration rejected"))]
    ValidationFailed { message: Option<String> },

    /// The bearer token is missing, expired, or invalid.
    #[error("unauthorized")]
    Unauthorized,

    /// No response was received.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The API answered with a status the call does not expect.
    #[error("unexpected status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    UnexpectedStatus { status: u16, message: Option<String> },

    /// A success response body could not be deserialized.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The session store could not persist the token.
    #[error("session storage failed: {0}")]
    Storage(#[from] StoreError),

    /// A login or registration is already in flight.
    #[error("another sign-in is already in progress")]
    Busy,
}

impl AuthError {
    /// Human-readable message carried by the API response, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::AuthRejected { message } | Self::ValidationFailed { message } | Self::UnexpectedStatus { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }
}

/// Errors produced by session store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted session could not be parsed.
    #[error("corrupt session data: {0}")]
    Corrupt(String),

    /// The storage backend is not reachable (e.g. no `localStorage`).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors produced while building [`crate::config::ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL '{0}' (expected http:// or https://)")]
    InvalidBaseUrl(String),
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
