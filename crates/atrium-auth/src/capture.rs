//! Credential capture: the only way raw login input becomes [`Credentials`].

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A validation failure raised before any network traffic happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required input was empty after trimming.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending input field.
        field: &'static str,
    },
}

/// In-flight login credentials.
///
/// Only constructible through [`Credentials::capture`], so both fields are
/// always trimmed and non-empty. The memory is zeroized when the value is
/// dropped, and the value is deliberately not `Clone`: there is exactly one
/// resident copy per login attempt.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Validates and normalizes raw user input.
    ///
    /// Both inputs are trimmed; an input that trims to empty fails with
    /// [`ValidationError::EmptyField`] and nothing downstream is invoked.
    /// Pure and idempotent.
    pub fn capture(raw_username: &str, raw_password: &str) -> Result<Self, ValidationError> {
        let username = raw_username.trim();
        if username.is_empty() {
            return Err(ValidationError::EmptyField { field: "username" });
        }

        let password = raw_password.trim();
        if password.is_empty() {
            return Err(ValidationError::EmptyField { field: "password" });
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// The trimmed username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The trimmed password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
