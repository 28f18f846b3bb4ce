//! Argon2id implementation of [`PasswordHasher`].

use std::future::Future;

use argon2::Argon2;
use argon2::password_hash::{self, PasswordHash, PasswordVerifier, SaltString};
use rand::rngs::OsRng;

use eventhub_app::ports::PasswordHasher;
use eventhub_domain::error::EventHubError;

/// Hashes passwords with Argon2id using the crate's default parameters.
#[derive(Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Well-formed hash of no real password, checked when no account matches.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$WALfdlYMTnIDZMniGZM1fA$xSPiU4UI1XUATIiRaxDVhqIvYFZmpuisdjJAZRjW9m0";

fn internal(err: &password_hash::Error) -> EventHubError {
    EventHubError::Internal(err.to_string().into())
}

fn hash_blocking(argon2: &Argon2<'_>, plain: &str) -> Result<String, EventHubError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = password_hash::PasswordHasher::hash_password(argon2, plain.as_bytes(), &salt)
        .map_err(|err| {
            tracing::error!(error = %err, "argon2 hash_password failed");
            internal(&err)
        })?;
    Ok(hash.to_string())
}

fn verify_blocking(argon2: &Argon2<'_>, plain: &str, hash: &str) -> Result<bool, EventHubError> {
    let parsed = PasswordHash::new(hash).map_err(|err| {
        tracing::error!(error = %err, "stored password hash is not a PHC string");
        internal(&err)
    })?;
    Ok(argon2.verify_password(plain.as_bytes(), &parsed).is_ok())
}

/// Run CPU-heavy argon2 work on the blocking pool.
async fn off_runtime<R, F>(work: F) -> Result<R, EventHubError>
where
    F: FnOnce() -> Result<R, EventHubError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| EventHubError::Internal(Box::new(err)))?
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain: String) -> impl Future<Output = Result<String, EventHubError>> + Send {
        let argon2 = self.argon2.clone();
        off_runtime(move || hash_blocking(&argon2, &plain))
    }

    fn verify(
        &self,
        plain: String,
        hash: String,
    ) -> impl Future<Output = Result<bool, EventHubError>> + Send {
        let argon2 = self.argon2.clone();
        off_runtime(move || verify_blocking(&argon2, &plain, &hash))
    }

    fn verify_decoy(&self, plain: String) -> impl Future<Output = Result<(), EventHubError>> + Send {
        let argon2 = self.argon2.clone();
        off_runtime(move || verify_blocking(&argon2, &plain, DECOY_HASH).map(|_| ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> String {
        value.to_string()
    }

    #[tokio::test]
    async fn should_verify_the_password_it_hashed() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash(s("s3cret")).await.unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify(s("s3cret"), hash).await.unwrap());
    }

    #[tokio::test]
    async fn should_reject_wrong_password() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash(s("correct-horse")).await.unwrap();

        assert!(!hasher.verify(s("battery-staple"), hash).await.unwrap());
    }

    #[tokio::test]
    async fn should_salt_each_hash() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash(s("same")).await.unwrap();
        let second = hasher.hash(s("same")).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn should_fail_on_malformed_hash() {
        let hasher = Argon2PasswordHasher::new();
        let result = hasher.verify(s("anything"), s("not-a-valid-hash")).await;

        assert!(matches!(result, Err(EventHubError::Internal(_))));
    }

    #[tokio::test]
    async fn should_check_decoy_hash_without_error() {
        let hasher = Argon2PasswordHasher::new();
        hasher.verify_decoy(s("whatever")).await.unwrap();

        let parsed = PasswordHash::new(DECOY_HASH).unwrap();
        let real = hasher.hash(s("whatever")).await.unwrap();
        let real = PasswordHash::new(&real).unwrap();
        assert_eq!(parsed.algorithm, real.algorithm);
        assert_eq!(parsed.params, real.params);
    }
}
