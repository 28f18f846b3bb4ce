//! User — a login identity.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{EventHubError, ValidationError};
use crate::id::UserId;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

/// A registered user.
///
/// `password_hash` never leaves the process: it is skipped when serializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Email and plaintext password submitted at sign-up or login.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check that both fields are present and the email looks like one.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Validation`] on an empty field or a malformed
    /// email.
    pub fn validate(&self) -> Result<(), EventHubError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::EmptyField("email").into());
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyField("password").into());
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ValidationError::InvalidEmail(self.email.clone()).into());
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
