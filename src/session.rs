//! Session controller: owns the token and user, and publishes every change.
//!
//! DESIGN
//! ======
//! The in-memory session is a single `SessionState` snapshot held by a
//! `tokio::sync::watch` channel. Every transition replaces the whole snapshot
//! with `send_replace`, so subscribers never observe a token from one session
//! paired with a user from another.
//!
//! The store is written only from here. The gateway reads it to attach the
//! bearer header, which is why the token is persisted before `/me` is called.
//!
//! TRADE-OFFS
//! ==========
//! - A login whose `/me` follow-up fails rolls the token back instead of
//!   exposing a half-authenticated state.
//! - Login and register share one in-flight guard; an overlapping call fails
//!   fast with `AuthError::Busy` rather than racing on the store slot.
//! - Logout tears down locally first and sends the remote revoke on a
//!   detached task whose outcome is only logged.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::AuthError;
use crate::gateway::AuthGateway;
use crate::store::SessionStore;
use crate::types::{LoginCredentials, RegisterCredentials, SessionToken, User};

// =============================================================================
// SESSION STATE
// =============================================================================

/// Coarse authentication status derived from a [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Stored session not yet resolved.
    Initializing,
    Authenticated,
    Anonymous,
}

/// Published session snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<SessionToken>,
    pub user: Option<User>,
    pub initializing: bool,
}

impl SessionState {
    /// Snapshot at application start, before the stored session is resolved.
    #[must_use]
    pub fn initial() -> Self {
        Self { token: None, user: None, initializing: true }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self { token: None, user: None, initializing: false }
    }

    #[must_use]
    pub fn authenticated(token: SessionToken, user: User) -> Self {
        Self { token: Some(token), user: Some(user), initializing: false }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.initializing {
            SessionStatus::Initializing
        } else if self.user.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

// =============================================================================
// IN-FLIGHT GUARD
// =============================================================================

/// Held for the duration of a login or register call.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct SessionController {
    gateway: Arc<dyn AuthGateway>,
    store: Arc<dyn SessionStore>,
    state: watch::Sender<SessionState>,
    in_flight: AtomicBool,
}

impl SessionController {
    #[must_use]
    pub fn new(gateway: Arc<dyn AuthGateway>, store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(SessionState::initial());
        Self { gateway, store, state, in_flight: AtomicBool::new(false) }
    }

    /// Receiver that observes every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    /// True while a login or register call is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn publish(&self, next: SessionState) {
        self.state.send_replace(next);
    }

    fn begin(&self) -> Result<InFlight<'_>, AuthError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::debug!("sign-in rejected; another is in flight");
            return Err(AuthError::Busy);
        }
        Ok(InFlight(&self.in_flight))
    }

    /// Drop the stored and in-memory session.
    fn reset(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "failed to clear session store");
        }
        self.publish(SessionState::anonymous());
    }

    /// Resolve the stored session, once per application load.
    ///
    /// A stored token the API no longer accepts is discarded silently; the
    /// caller only sees the resulting anonymous state.
    pub async fn initialize(&self) {
        let stored = match self.store.get() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "session store unreadable; starting anonymous");
                self.reset();
                return;
            }
        };

        let Some(token) = stored else {
            tracing::debug!("no stored session");
            self.publish(SessionState::anonymous());
            return;
        };

        self.publish(SessionState { token: Some(token.clone()), user: None, initializing: true });

        match self.gateway.fetch_current_user().await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "stored session restored");
                self.publish(SessionState::authenticated(token, user));
            }
            Err(e) => {
                tracing::debug!(error = %e, "stored session rejected; clearing");
                self.reset();
            }
        }
    }

    /// Exchange credentials for a session and load the user.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors unchanged. [`AuthError::Busy`] if another
    /// login or register is in flight; [`AuthError::Storage`] if the token
    /// cannot be persisted.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, AuthError> {
        let _guard = self.begin()?;
        self.login_unguarded(credentials).await
    }

    /// Create an account, then log in with the same email and password.
    ///
    /// # Errors
    ///
    /// Propagates the register error, or any error from the chained login.
    pub async fn register(&self, credentials: &RegisterCredentials) -> Result<User, AuthError> {
        let _guard = self.begin()?;
        self.gateway.register(credentials).await?;
        tracing::info!("account registered; signing in");
        self.login_unguarded(&credentials.login_credentials()).await
    }

    async fn login_unguarded(&self, credentials: &LoginCredentials) -> Result<User, AuthError> {
        let token = self.gateway.login(credentials).await?;

        if let Err(e) = self.store.set(&token) {
            self.reset();
            return Err(e.into());
        }
        self.publish(SessionState { token: Some(token.clone()), user: None, initializing: false });

        match self.gateway.fetch_current_user().await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "session authenticated");
                self.publish(SessionState::authenticated(token, user.clone()));
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "user fetch after login failed; rolling back token");
                self.reset();
                Err(e)
            }
        }
    }

    /// End the session locally and revoke it remotely in the background.
    ///
    /// Local teardown completes before this returns. The returned handle
    /// resolves when the remote call finishes; its outcome is never surfaced.
    /// Returns `None` when there was no session to end, or when no tokio
    /// runtime is available to carry the remote call.
    pub fn logout(&self) -> Option<JoinHandle<()>> {
        let current = self.state();
        let stored = self.store.get().ok().flatten();
        let token = current.token.or(stored);
        if token.is_none() && current.user.is_none() {
            tracing::debug!("logout with no active session");
            return None;
        }

        self.reset();
        tracing::info!("session ended locally");

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no async runtime; skipping remote logout");
            return None;
        };
        let gateway = Arc::clone(&self.gateway);
        Some(runtime.spawn(async move {
            if let Err(e) = gateway.logout(token.as_ref()).await {
                tracing::debug!(error = %e, "remote logout failed; ignored");
            }
        }))
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
