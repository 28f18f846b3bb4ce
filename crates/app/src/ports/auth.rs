//! Authentication ports — password hashing and token issuance.
//!
//! Hashing is async so implementations can move the work off the runtime's
//! worker threads. Token handling is cheap and stays synchronous.

use std::future::Future;

use eventhub_domain::error::EventHubError;
use eventhub_domain::id::UserId;
use eventhub_domain::user::User;

/// One-way password hashing.
pub trait PasswordHasher {
    /// Hash a plaintext password into a self-describing string.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Internal`] if the hashing backend fails.
    fn hash(&self, plain: String) -> impl Future<Output = Result<String, EventHubError>> + Send;

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Internal`] if `hash` cannot be parsed.
    fn verify(
        &self,
        plain: String,
        hash: String,
    ) -> impl Future<Output = Result<bool, EventHubError>> + Send;

    /// Do the work of [`verify`](Self::verify) against a fixed hash and
    /// discard the outcome. Used when no account matches, so that case costs
    /// as much as a wrong password.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Internal`] if the hashing backend fails.
    fn verify_decoy(&self, plain: String) -> impl Future<Output = Result<(), EventHubError>> + Send;
}

/// Issues and verifies the bearer tokens handed out at login.
pub trait TokenIssuer {
    /// Issue a token identifying `user`.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Internal`] if signing fails.
    fn issue(&self, user: &User) -> Result<String, EventHubError>;

    /// Verify a token and return the user it identifies.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Unauthorized`] when the token is malformed,
    /// tampered with, or expired.
    fn verify(&self, token: &str) -> Result<UserId, EventHubError>;
}
