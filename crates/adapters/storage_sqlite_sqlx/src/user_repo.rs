//! `SQLite` implementation of [`UserRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eventhub_app::ports::UserRepository;
use eventhub_domain::error::EventHubError;
use eventhub_domain::id::UserId;
use eventhub_domain::user::User;

use crate::error::{StorageError, is_unique_violation};

/// Wrapper for converting database rows into domain [`User`].
struct Wrapper(User);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let email: String = row.try_get("email")?;
        let password_hash: String = row.try_get("password")?;

        Ok(Self(User {
            id: UserId::new(id),
            email,
            password_hash,
        }))
    }
}

const INSERT: &str = "INSERT INTO users (email, password) VALUES (?, ?)";
const SELECT_BY_EMAIL: &str = "SELECT id, email, password FROM users WHERE email = ?";

/// `SQLite`-backed user repository.
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, email: String, password_hash: String) -> Result<User, EventHubError> {
        let result = sqlx::query(INSERT)
            .bind(&email)
            .bind(&password_hash)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(User {
                id: UserId::new(done.last_insert_rowid()),
                email,
                password_hash,
            }),
            Err(err) if is_unique_violation(&err) => Err(EventHubError::DuplicateEmail { email }),
            Err(err) => Err(StorageError::from(err).into()),
        }
    }

    async fn find_by_email(&self, email: String) -> Result<Option<User>, EventHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteUserRepository {
        let db = Config::new("sqlite::memory:").build().await.unwrap();
        SqliteUserRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn should_create_and_find_user_by_email() {
        let repo = setup().await;
        let created = repo
            .create("test@example.com".to_string(), "hash1".to_string())
            .await
            .unwrap();
        assert_eq!(created.id, UserId::new(1));

        let fetched = repo
            .find_by_email("test@example.com".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.email, "test@example.com");
        assert_eq!(fetched.password_hash, "hash1");
    }

    #[tokio::test]
    async fn should_return_none_when_email_unknown() {
        let repo = setup().await;
        let result = repo
            .find_by_email("ghost@example.com".to_string())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_reject_duplicate_email_and_keep_single_row() {
        let repo = setup().await;
        repo.create("test@example.com".to_string(), "hash1".to_string())
            .await
            .unwrap();

        let result = repo
            .create("test@example.com".to_string(), "hash2".to_string())
            .await;
        assert!(matches!(
            result,
            Err(EventHubError::DuplicateEmail { ref email }) if email == "test@example.com"
        ));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let kept = repo
            .find_by_email("test@example.com".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.password_hash, "hash1");
    }

    #[tokio::test]
    async fn should_assign_increasing_ids() {
        let repo = setup().await;
        let a = repo
            .create("a@example.com".to_string(), "h".to_string())
            .await
            .unwrap();
        let b = repo
            .create("b@example.com".to_string(), "h".to_string())
            .await
            .unwrap();
        assert!(b.id > a.id);
    }
}
