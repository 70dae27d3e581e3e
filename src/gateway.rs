//! Remote auth API gateway.
//!
//! ARCHITECTURE
//! ============
//! `AuthGateway` is the seam between the session controller and the network.
//! `HttpGateway` is the reqwest-backed implementation; tests substitute a
//! scripted mock. Each call is a single attempt with no retry.
//!
//! ERROR HANDLING
//! ==============
//! Status codes are classified per endpoint by [`classify`] so a 4xx on
//! `/login` becomes `AuthRejected` while the same status on `/register`
//! becomes `ValidationFailed`. The user-facing message is lifted from the
//! response body by [`extract_message`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderValue};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::AuthError;
use crate::store::SessionStore;
use crate::types::{LoginCredentials, LoginResponse, RegisterCredentials, SessionToken, User};

// =============================================================================
// GATEWAY TRAIT
// =============================================================================

/// The four remote operations of the auth API. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a bearer token via `POST /login`.
    ///
    /// # Errors
    ///
    /// [`AuthError::AuthRejected`] on bad credentials, or a transport error.
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionToken, AuthError>;

    /// Create an account via `POST /register`. Does not authenticate.
    ///
    /// # Errors
    ///
    /// [`AuthError::ValidationFailed`] on rejected input, or a transport error.
    async fn register(&self, credentials: &RegisterCredentials) -> Result<(), AuthError>;

    /// Resolve the stored bearer token to a user via `GET /me`.
    ///
    /// # Errors
    ///
    /// [`AuthError::Unauthorized`] if the token is missing, expired, or invalid.
    async fn fetch_current_user(&self) -> Result<User, AuthError>;

    /// Revoke `token` via `POST /logout`. Best-effort.
    ///
    /// # Errors
    ///
    /// Any failure; callers are expected to discard it.
    async fn logout(&self, token: Option<&SessionToken>) -> Result<(), AuthError>;
}

// =============================================================================
// RESPONSE CLASSIFICATION
// =============================================================================

/// Remote endpoint a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    Me,
    Logout,
}

impl Endpoint {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Me => "/me",
            Self::Logout => "/logout",
        }
    }
}

/// Map a response status to success or the endpoint's error variant.
///
/// # Errors
///
/// Returns the [`AuthError`] matching `endpoint` and `status` for any non-2xx.
pub fn classify(endpoint: Endpoint, status: u16, body: &str) -> Result<(), AuthError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = extract_message(body);
    Err(match (endpoint, status) {
        (Endpoint::Me, 401) => AuthError::Unauthorized,
        (Endpoint::Login, 400..=499) => AuthError::AuthRejected { message },
        (Endpoint::Register, 400..=499) => AuthError::ValidationFailed { message },
        _ => AuthError::UnexpectedStatus { status, message },
    })
}

/// Pull a human-readable message out of an error body.
///
/// Prefers a top-level `message` string, then the first entry of a
/// field-keyed `errors` map (`{"errors": {"email": ["taken"]}}`).
#[must_use]
pub fn extract_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    if let Some(message) = json.get("message").and_then(Value::as_str).filter(|m| !m.trim().is_empty()) {
        return Some(message.to_owned());
    }
    let (_, first) = json.get("errors")?.as_object()?.iter().next()?;
    match first {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(Value::as_str).map(str::to_owned),
        _ => None,
    }
}

// =============================================================================
// HTTP GATEWAY
// =============================================================================

/// reqwest-backed gateway. Attaches the stored token as a bearer credential
/// on every request.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl HttpGateway {
    /// Build a gateway for `config.base_url` reading tokens from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), store })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn stored_token(&self) -> Option<SessionToken> {
        match self.store.get() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "session store unreadable; sending request without bearer");
                None
            }
        }
    }

    fn request(&self, method: reqwest::Method, endpoint: Endpoint, bearer: Option<&SessionToken>) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let builder = self.http.request(method, url).header(ACCEPT, HeaderValue::from_static("application/json"));
        match bearer {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    async fn send(&self, endpoint: Endpoint, builder: reqwest::RequestBuilder) -> Result<String, AuthError> {
        let response = builder
            .send()
            .await
            .map_err(|e| AuthError::NetworkFailure(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::NetworkFailure(e.to_string()))?;
        tracing::debug!(path = endpoint.path(), status, "auth api response");
        classify(endpoint, status, &body)?;
        Ok(body)
    }
}

#[async_trait::async_trait]
impl AuthGateway for HttpGateway {
    async fn login(&self, credentials: &LoginCredentials) -> Result<SessionToken, AuthError> {
        let bearer = self.stored_token();
        let builder = self
            .request(reqwest::Method::POST, Endpoint::Login, bearer.as_ref())
            .json(credentials);
        let body = self.send(Endpoint::Login, builder).await?;
        let resp: LoginResponse = serde_json::from_str(&body).map_err(|e| AuthError::Decode(e.to_string()))?;
        Ok(resp.token)
    }

    async fn register(&self, credentials: &RegisterCredentials) -> Result<(), AuthError> {
        let bearer = self.stored_token();
        let builder = self
            .request(reqwest::Method::POST, Endpoint::Register, bearer.as_ref())
            .json(credentials);
        self.send(Endpoint::Register, builder).await?;
        Ok(())
    }

    async fn fetch_current_user(&self) -> Result<User, AuthError> {
        let bearer = self.stored_token();
        let builder = self.request(reqwest::Method::GET, Endpoint::Me, bearer.as_ref());
        let body = self.send(Endpoint::Me, builder).await?;
        serde_json::from_str(&body).map_err(|e| AuthError::Decode(e.to_string()))
    }

    async fn logout(&self, token: Option<&SessionToken>) -> Result<(), AuthError> {
        let builder = self.request(reqwest::Method::POST, Endpoint::Logout, token);
        self.send(Endpoint::Logout, builder).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
