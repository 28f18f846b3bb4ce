//! User service — sign-up, login, and token authentication.

use eventhub_domain::error::{AuthError, EventHubError, NotFoundError};
use eventhub_domain::id::UserId;
use eventhub_domain::user::{Credentials, User};

use crate::ports::{PasswordHasher, TokenIssuer, UserRepository};

/// Application service for user accounts.
pub struct UserService<R, H, T> {
    repo: R,
    hasher: H,
    tokens: T,
}

impl<R, H, T> UserService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher,
    T: TokenIssuer,
{
    /// Create a new service from its repository and auth collaborators.
    pub fn new(repo: R, hasher: H, tokens: T) -> Self {
        Self {
            repo,
            hasher,
            tokens,
        }
    }

    /// Register a new account. Only the password hash is stored.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Validation`] on malformed credentials,
    /// [`EventHubError::DuplicateEmail`] when the email is taken, or an
    /// infrastructure error.
    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn sign_up(&self, credentials: Credentials) -> Result<User, EventHubError> {
        credentials.validate()?;
        let hash = self.hasher.hash(credentials.password).await?;
        let user = self.repo.create(credentials.email, hash).await?;
        tracing::info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    /// Check credentials and issue a token.
    ///
    /// An unknown email and a wrong password are reported identically.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Unauthorized`] with
    /// [`AuthError::InvalidCredentials`] when the credentials do not match.
    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn log_in(&self, credentials: Credentials) -> Result<String, EventHubError> {
        credentials.validate()?;
        let Some(user) = self.repo.find_by_email(credentials.email).await? else {
            self.hasher.verify_decoy(credentials.password).await?;
            return Err(AuthError::InvalidCredentials.into());
        };
        if !self
            .hasher
            .verify(credentials.password, user.password_hash.clone())
            .await?
        {
            tracing::debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::InvalidCredentials.into());
        }
        self.tokens.issue(&user)
    }

    /// Look up a user by email.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::NotFound`] when no user has this email.
    pub async fn find_by_email(&self, email: &str) -> Result<User, EventHubError> {
        self.repo
            .find_by_email(email.to_string())
            .await?
            .ok_or_else(|| {
                NotFoundError {
                    entity: "User",
                    id: email.to_string(),
                }
                .into()
            })
    }

    /// Resolve a bearer token to the user it identifies.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Unauthorized`] when the token is invalid.
    pub fn authenticate(&self, token: &str) -> Result<UserId, EventHubError> {
        if token.trim().is_empty() {
            return Err(AuthError::MissingToken.into());
        }
        self.tokens.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct InMemoryUserRepo {
        store: Mutex<Vec<User>>,
    }

    impl UserRepository for InMemoryUserRepo {
        fn create(
            &self,
            email: String,
            password_hash: String,
        ) -> impl Future<Output = Result<User, EventHubError>> + Send {
            let mut store = self.store.lock().unwrap();
            let result = if store.iter().any(|u| u.email == email) {
                Err(EventHubError::DuplicateEmail { email })
            } else {
                let user = User {
                    id: UserId::new(i64::try_from(store.len()).unwrap() + 1),
                    email,
                    password_hash,
                };
                store.push(user.clone());
                Ok(user)
            };
            async { result }
        }

        fn find_by_email(
            &self,
            email: String,
        ) -> impl Future<Output = Result<Option<User>, EventHubError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.iter().find(|u| u.email == email).cloned();
            async { Ok(result) }
        }
    }

    #[derive(Default)]
    struct PrefixHasher {
        verifications: AtomicUsize,
        decoys: AtomicUsize,
    }

    impl PasswordHasher for PrefixHasher {
        async fn hash(&self, plain: String) -> Result<String, EventHubError> {
            Ok(format!("hashed:{plain}"))
        }

        async fn verify(&self, plain: String, hash: String) -> Result<bool, EventHubError> {
            self.verifications.fetch_add(1, Ordering::SeqCst);
            Ok(hash == format!("hashed:{plain}"))
        }

        async fn verify_decoy(&self, _plain: String) -> Result<(), EventHubError> {
            self.decoys.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct IdTokens;

    impl TokenIssuer for IdTokens {
        fn issue(&self, user: &User) -> Result<String, EventHubError> {
            Ok(format!("token-{}", user.id))
        }

        fn verify(&self, token: &str) -> Result<UserId, EventHubError> {
            token
                .strip_prefix("token-")
                .and_then(|id| id.parse().ok())
                .ok_or_else(|| AuthError::InvalidToken.into())
        }
    }

    fn make_service() -> UserService<InMemoryUserRepo, PrefixHasher, IdTokens> {
        UserService::new(InMemoryUserRepo::default(), PrefixHasher::default(), IdTokens)
    }

    fn creds() -> Credentials {
        Credentials::new("alice@example.com", "hunter2")
    }

    #[tokio::test]
    async fn should_store_hash_instead_of_plaintext_when_signing_up() {
        let svc = make_service();
        svc.sign_up(creds()).await.unwrap();

        let user = svc.find_by_email("alice@example.com").await.unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_ne!(user.password_hash, "hunter2");
        assert_eq!(user.password_hash, "hashed:hunter2");
    }

    #[tokio::test]
    async fn should_reject_duplicate_email() {
        let svc = make_service();
        svc.sign_up(creds()).await.unwrap();

        let result = svc.sign_up(creds()).await;
        assert!(matches!(result, Err(EventHubError::DuplicateEmail { .. })));
    }

    #[tokio::test]
    async fn should_reject_invalid_credentials_before_hashing() {
        let svc = make_service();
        let result = svc.sign_up(Credentials::new("nope", "hunter2")).await;
        assert!(matches!(result, Err(EventHubError::Validation(_))));
    }

    #[tokio::test]
    async fn should_issue_token_when_credentials_match() {
        let svc = make_service();
        let user = svc.sign_up(creds()).await.unwrap();

        let token = svc.log_in(creds()).await.unwrap();
        assert_eq!(svc.authenticate(&token).unwrap(), user.id);
    }

    #[tokio::test]
    async fn should_reject_login_with_wrong_password() {
        let svc = make_service();
        svc.sign_up(creds()).await.unwrap();

        let result = svc
            .log_in(Credentials::new("alice@example.com", "wrong"))
            .await;
        assert!(matches!(
            result,
            Err(EventHubError::Unauthorized(AuthError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn should_reject_login_for_unknown_email() {
        let svc = make_service();
        let result = svc.log_in(creds()).await;
        assert!(matches!(
            result,
            Err(EventHubError::Unauthorized(AuthError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn should_spend_a_password_check_on_unknown_email() {
        let svc = make_service();
        svc.log_in(creds()).await.unwrap_err();

        assert_eq!(svc.hasher.decoys.load(Ordering::SeqCst), 1);
        assert_eq!(svc.hasher.verifications.load(Ordering::SeqCst), 0);

        svc.sign_up(creds()).await.unwrap();
        svc.log_in(creds()).await.unwrap();
        assert_eq!(svc.hasher.decoys.load(Ordering::SeqCst), 1);
        assert_eq!(svc.hasher.verifications.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_email() {
        let svc = make_service();
        let result = svc.find_by_email("ghost@example.com").await;
        assert!(matches!(result, Err(EventHubError::NotFound(_))));
    }

    #[test]
    fn should_reject_empty_token() {
        let svc = make_service();
        assert!(matches!(
            svc.authenticate(""),
            Err(EventHubError::Unauthorized(AuthError::MissingToken))
        ));
    }
}
