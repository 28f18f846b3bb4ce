//! `SQLite` implementation of [`RegistrationRepository`].

use sqlx::SqlitePool;

use eventhub_app::ports::RegistrationRepository;
use eventhub_domain::error::{EventHubError, NotFoundError};
use eventhub_domain::id::{EventId, RegistrationId, UserId};
use eventhub_domain::registration::Registration;

use crate::error::{StorageError, is_foreign_key_violation};

const EVENT_EXISTS: &str = "SELECT EXISTS (SELECT 1 FROM events WHERE id = ?)";
const USER_EXISTS: &str = "SELECT EXISTS (SELECT 1 FROM users WHERE id = ?)";
const IS_REGISTERED: &str =
    "SELECT EXISTS (SELECT 1 FROM registrations WHERE event_id = ? AND user_id = ?)";

// The schema has no unique index on (event_id, user_id); the existence test
// and the insert run as one statement so concurrent callers cannot both win.
const INSERT_UNLESS_REGISTERED: &str = r"
    INSERT INTO registrations (event_id, user_id)
    SELECT ?, ?
    WHERE NOT EXISTS (SELECT 1 FROM registrations WHERE event_id = ? AND user_id = ?)
";

const DELETE: &str = "DELETE FROM registrations WHERE event_id = ? AND user_id = ?";

/// `SQLite`-backed registration repository.
pub struct SqliteRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn exists(&self, statement: &'static str, id: i64) -> Result<bool, StorageError> {
        let found: bool = sqlx::query_scalar(statement)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found)
    }
}

fn not_found(entity: &'static str, id: impl ToString) -> EventHubError {
    NotFoundError {
        entity,
        id: id.to_string(),
    }
    .into()
}

impl RegistrationRepository for SqliteRegistrationRepository {
    async fn register(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<Registration, EventHubError> {
        if !self.exists(EVENT_EXISTS, event_id.as_i64()).await? {
            return Err(not_found("Event", event_id));
        }
        if !self.exists(USER_EXISTS, user_id.as_i64()).await? {
            return Err(not_found("User", user_id));
        }

        let result = sqlx::query(INSERT_UNLESS_REGISTERED)
            .bind(event_id.as_i64())
            .bind(user_id.as_i64())
            .bind(event_id.as_i64())
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                Err(EventHubError::AlreadyRegistered { event_id, user_id })
            }
            Ok(done) => Ok(Registration {
                id: RegistrationId::new(done.last_insert_rowid()),
                event_id,
                user_id,
            }),
            // The event was deleted between the existence check and the insert.
            Err(err) if is_foreign_key_violation(&err) => Err(not_found("Event", event_id)),
            Err(err) => Err(StorageError::from(err).into()),
        }
    }

    async fn unregister(&self, event_id: EventId, user_id: UserId) -> Result<(), EventHubError> {
        let done = sqlx::query(DELETE)
            .bind(event_id.as_i64())
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if done.rows_affected() == 0 {
            return Err(not_found("Registration", format!("{event_id}/{user_id}")));
        }
        Ok(())
    }

    async fn is_registered(&self, event_id: EventId, user_id: UserId) -> Result<bool, EventHubError> {
        let found: bool = sqlx::query_scalar(IS_REGISTERED)
            .bind(event_id.as_i64())
            .bind(user_id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(found)
    }
}
