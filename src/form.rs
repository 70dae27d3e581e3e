//! Sign-in form checks and user-facing error text.
//!
//! These run in front of the session controller: password confirmation is
//! checked locally before any request is made, and controller errors are
//! turned into the single line shown under the form.

use crate::error::AuthError;
use crate::types::{LoginCredentials, RegisterCredentials};

/// Which form is being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    /// Message shown when the error carries no server text.
    #[must_use]
    pub fn failure_fallback(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Raw login form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    #[must_use]
    pub fn credentials(&self) -> LoginCredentials {
        LoginCredentials::new(self.email.trim(), self.password.clone())
    }
}

/// Raw registration form input, including the confirmation field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// Check the confirmation field and produce the request credentials.
    ///
    /// # Errors
    ///
    /// [`FormError::PasswordMismatch`] if the two password fields differ.
    pub fn validate(&self) -> Result<RegisterCredentials, FormError> {
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(RegisterCredentials::new(self.name.trim(), self.email.trim(), self.password.clone()))
    }
}

/// Line to display for a failed submit.
#[must_use]
pub fn submit_error_message(err: &AuthError, mode: AuthMode) -> String {
    match err {
        AuthError::Busy => err.to_string(),
        _ => err.message().unwrap_or(mode.failure_fallback()).to_owned(),
    }
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
