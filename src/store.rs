//! Session store backends.
//!
//! DESIGN
//! ======
//! The store is a single durable slot holding the current bearer token. The
//! session controller is its only writer; the HTTP gateway reads it on every
//! request to attach the bearer header. Contents are opaque and never
//! validated here.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::SessionToken;

/// Key the token is persisted under.
pub const TOKEN_KEY: &str = "auth_token";

/// Durable slot for the active session token.
pub trait SessionStore: Send + Sync {
    /// Read the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be read.
    fn get(&self) -> Result<Option<SessionToken>, StoreError>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be written.
    fn set(&self, token: &SessionToken) -> Result<(), StoreError>;

    /// Remove the stored token. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be written.
    fn clear(&self) -> Result<(), StoreError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-local store. Lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<SessionToken>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`, as if left over from a prior session.
    #[must_use]
    pub fn with_token(token: SessionToken) -> Self {
        Self { slot: Mutex::new(Some(token)) }
    }
}

impl SessionStore for MemoryStore {
    fn get(&self) -> Result<Option<SessionToken>, StoreError> {
        Ok(self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone())
    }

    fn set(&self, token: &SessionToken) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

#[derive(Serialize, Deserialize)]
struct PersistedSession {
    auth_token: SessionToken,
}

/// JSON file holding `{"auth_token": "..."}`. Survives process restarts.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileStore {
    fn get(&self) -> Result<Option<SessionToken>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let persisted: PersistedSession =
            serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(Some(persisted.auth_token))
    }

    fn set(&self, token: &SessionToken) -> Result<(), StoreError> {
        let body = serde_json::to_vec(&PersistedSession { auth_token: token.clone() })
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let tmp = self.tmp_path();
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// BROWSER STORE
// =============================================================================

/// `window.localStorage` under [`TOKEN_KEY`].
#[cfg(feature = "web")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

#[cfg(feature = "web")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_owned()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_owned()))
    }
}

// web-sys handles are !Send on wasm32, so the store reacquires them per call.
#[cfg(feature = "web")]
impl SessionStore for LocalStorageStore {
    fn get(&self) -> Result<Option<SessionToken>, StoreError> {
        let raw = Self::storage()?
            .get_item(TOKEN_KEY)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
        Ok(raw.map(SessionToken::new))
    }

    fn set(&self, token: &SessionToken) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(TOKEN_KEY, token.as_str())
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }

    fn clear(&self) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(TOKEN_KEY)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
