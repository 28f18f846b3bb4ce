//! `SQLite` implementation of [`EventRepository`].
//!
//! Ownership is checked inside the write statement itself (`… AND user_id = ?`),
//! so a rejected update or delete never touches the row. When nothing was
//! written, a follow-up read works out which error to report.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use eventhub_app::ports::EventRepository;
use eventhub_domain::error::{EventHubError, ForbiddenError, NotFoundError};
use eventhub_domain::event::{DeletePolicy, Event, EventDetails};
use eventhub_domain::id::{EventId, UserId};

use crate::error::{StorageError, is_foreign_key_violation};
use crate::timestamp;

/// Wrapper for converting database rows into domain [`Event`].
struct Wrapper(Event);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Event> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let description: String = row.try_get("description")?;
        let location: String = row.try_get("location")?;
        let date_time: String = row.try_get("dateTime")?;
        let user_id: Option<i64> = row.try_get("user_id")?;

        Ok(Self(Event {
            id: EventId::new(id),
            name,
            description,
            location,
            date_time: timestamp::decode(&date_time)?,
            user_id: user_id.map(UserId::new),
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO events (name, description, location, dateTime, user_id)
    VALUES (?, ?, ?, ?, ?)
";

const SELECT_ALL: &str =
    "SELECT id, name, description, location, dateTime, user_id FROM events ORDER BY id";
const SELECT_BY_ID: &str =
    "SELECT id, name, description, location, dateTime, user_id FROM events WHERE id = ?";
const SELECT_OWNER: &str = "SELECT user_id FROM events WHERE id = ?";
const COUNT_REGISTRATIONS: &str = "SELECT COUNT(*) FROM registrations WHERE event_id = ?";

const UPDATE_OWNED: &str = r"
    UPDATE events
    SET name = ?, description = ?, location = ?, dateTime = ?
    WHERE id = ? AND user_id = ?
";

const DELETE_REGISTRATIONS_OF_OWNED: &str = r"
    DELETE FROM registrations
    WHERE event_id = ?
      AND EXISTS (SELECT 1 FROM events WHERE id = ? AND user_id = ?)
";
const DELETE_OWNED: &str = "DELETE FROM events WHERE id = ? AND user_id = ?";
const DELETE_OWNED_WITHOUT_REGISTRATIONS: &str = r"
    DELETE FROM events
    WHERE id = ? AND user_id = ?
      AND NOT EXISTS (SELECT 1 FROM registrations WHERE event_id = ?)
";

/// `SQLite`-backed event repository.
pub struct SqliteEventRepository {
    pool: SqlitePool,
    delete_policy: DeletePolicy,
}

impl SqliteEventRepository {
    /// Create a new repository using the given connection pool.
    ///
    /// Deleting an event cascades to its registrations unless
    /// [`with_delete_policy`](Self::with_delete_policy) says otherwise.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            delete_policy: DeletePolicy::default(),
        }
    }

    /// Choose what happens to registrations when an event is deleted.
    #[must_use]
    pub fn with_delete_policy(mut self, delete_policy: DeletePolicy) -> Self {
        self.delete_policy = delete_policy;
        self
    }

    /// Explain why a guarded write on `id` affected no row, unless the
    /// requester owns the event.
    async fn rejection(
        &self,
        id: EventId,
        requester: UserId,
        action: &'static str,
    ) -> Result<Option<EventHubError>, EventHubError> {
        let owner: Option<(Option<i64>,)> = sqlx::query_as(SELECT_OWNER)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let Some((owner,)) = owner else {
            return Ok(Some(
                NotFoundError {
                    entity: "Event",
                    id: id.to_string(),
                }
                .into(),
            ));
        };

        if owner != Some(requester.as_i64()) {
            return Ok(Some(
                ForbiddenError {
                    action,
                    event_id: id,
                    user_id: requester,
                }
                .into(),
            ));
        }
        Ok(None)
    }

    async fn registration_count(&self, id: EventId) -> Result<u64, EventHubError> {
        let (registrations,): (i64,) = sqlx::query_as(COUNT_REGISTRATIONS)
            .bind(id.as_i64())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(u64::try_from(registrations).unwrap_or_default())
    }

    async fn delete_cascading(&self, id: EventId, requester: UserId) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let registrations = sqlx::query(DELETE_REGISTRATIONS_OF_OWNED)
            .bind(id.as_i64())
            .bind(id.as_i64())
            .bind(requester.as_i64())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query(DELETE_OWNED)
            .bind(id.as_i64())
            .bind(requester.as_i64())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
        } else {
            tx.commit().await?;
            tracing::debug!(event_id = %id, registrations, "removed registrations with event");
        }
        Ok(deleted)
    }

    async fn delete_unreferenced(&self, id: EventId, requester: UserId) -> Result<u64, sqlx::Error> {
        let done = sqlx::query(DELETE_OWNED_WITHOUT_REGISTRATIONS)
            .bind(id.as_i64())
            .bind(requester.as_i64())
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected())
    }
}

impl EventRepository for SqliteEventRepository {
    async fn create(&self, details: EventDetails, owner: UserId) -> Result<Event, EventHubError> {
        let result = sqlx::query(INSERT)
            .bind(&details.name)
            .bind(&details.description)
            .bind(&details.location)
            .bind(timestamp::encode(details.date_time))
            .bind(owner.as_i64())
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(Event {
                id: EventId::new(done.last_insert_rowid()),
                name: details.name,
                description: details.description,
                location: details.location,
                date_time: details.date_time,
                user_id: Some(owner),
            }),
            Err(err) if is_foreign_key_violation(&err) => Err(NotFoundError {
                entity: "User",
                id: owner.to_string(),
            }
            .into()),
            Err(err) => Err(StorageError::from(err).into()),
        }
    }

    async fn get_all(&self) -> Result<Vec<Event>, EventHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn get_by_id(&self, id: EventId) -> Result<Option<Event>, EventHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn update(
        &self,
        id: EventId,
        details: EventDetails,
        requester: UserId,
    ) -> Result<Event, EventHubError> {
        let done = sqlx::query(UPDATE_OWNED)
            .bind(&details.name)
            .bind(&details.description)
            .bind(&details.location)
            .bind(timestamp::encode(details.date_time))
            .bind(id.as_i64())
            .bind(requester.as_i64())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if done.rows_affected() == 0 {
            return Err(self
                .rejection(id, requester, "update")
                .await?
                .unwrap_or_else(|| EventHubError::Internal("event update affected no row".into())));
        }

        Ok(Event {
            id,
            name: details.name,
            description: details.description,
            location: details.location,
            date_time: details.date_time,
            user_id: Some(requester),
        })
    }

    async fn delete(&self, id: EventId, requester: UserId) -> Result<(), EventHubError> {
        let mut retried = false;
        loop {
            let deleted = match self.delete_policy {
                DeletePolicy::Cascade => self.delete_cascading(id, requester).await,
                DeletePolicy::Reject => self.delete_unreferenced(id, requester).await,
            }
            .map_err(StorageError::from)?;

            if deleted > 0 {
                return Ok(());
            }
            if let Some(err) = self.rejection(id, requester, "delete").await? {
                return Err(err);
            }

            let registrations = self.registration_count(id).await?;
            if registrations > 0 {
                return Err(EventHubError::ConflictingDependents {
                    event_id: id,
                    registrations,
                });
            }
            // Registrations went away after the guarded delete ran.
            if retried {
                return Err(EventHubError::Internal("event delete affected no row".into()));
            }
            retried = true;
            tracing::debug!(event_id = %id, "registrations cleared during delete, retrying");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Config, Database};
    use chrono::{TimeZone, Utc};

    async fn setup() -> (Database, UserId, UserId) {
        let db = Config::new("sqlite::memory:").build().await.unwrap();
        let mut ids = Vec::new();
        for email in ["owner@example.com", "other@example.com"] {
            let done = sqlx::query("INSERT INTO users (email, password) VALUES (?, 'hash')")
                .bind(email)
                .execute(db.pool())
                .await
                .unwrap();
            ids.push(UserId::new(done.last_insert_rowid()));
        }
        (db, ids[0], ids[1])
    }

    fn conf() -> EventDetails {
        EventDetails::builder()
            .name("Conf")
            .description("desc")
            .location("NYC")
            .date_time(Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap())
            .build()
            .unwrap()
    }

    async fn register(db: &Database, event: EventId, user: UserId) {
        sqlx::query("INSERT INTO registrations (event_id, user_id) VALUES (?, ?)")
            .bind(event.as_i64())
            .bind(user.as_i64())
            .execute(db.pool())
            .await
            .unwrap();
    }

    async fn registration_count(db: &Database, event: EventId) -> i64 {
        let (count,): (i64,) = sqlx::query_as(COUNT_REGISTRATIONS)
            .bind(event.as_i64())
            .fetch_one(db.pool())
            .await
            .unwrap();
        count
    }

    #[tokio::test]
    async fn should_create_and_retrieve_event_with_same_fields() {
        let (db, owner, _) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone());

        let created = repo.create(conf(), owner).await.unwrap();
        assert_eq!(created.id, EventId::new(1));

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.details(), conf());
        assert_eq!(fetched.user_id, Some(owner));
    }

    #[tokio::test]
    async fn should_return_none_when_event_not_found() {
        let (db, _, _) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone());
        assert!(repo.get_by_id(EventId::new(404)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_return_not_found_when_owner_does_not_exist() {
        let (db, _, _) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone());

        let result = repo.create(conf(), UserId::new(999)).await;
        assert!(matches!(
            result,
            Err(EventHubError::NotFound(NotFoundError { entity: "User", .. }))
        ));
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_list_events_ordered_by_id() {
        let (db, owner, other) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone());
        let first = repo.create(conf(), owner).await.unwrap();
        let second = repo.create(conf(), other).await.unwrap();

        let all = repo.get_all().await.unwrap();
        let ids: Vec<EventId> = all.iter().map(|e| e.id).collect();
        assert_eq!(ids, [first.id, second.id]);
    }

    #[tokio::test]
    async fn should_update_event_when_requested_by_owner() {
        let (db, owner, _) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone());
        let created = repo.create(conf(), owner).await.unwrap();

        let mut details = conf();
        details.name = "Meetup".to_string();
        details.date_time = Utc.with_ymd_and_hms(2026, 6, 1, 18, 30, 0).unwrap();
        repo.update(created.id, details.clone(), owner).await.unwrap();

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.details(), details);
        assert_eq!(fetched.user_id, Some(owner));
    }

    #[tokio::test]
    async fn should_forbid_update_by_non_owner_and_leave_row_unchanged() {
        let (db, owner, other) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone());
        let created = repo.create(conf(), owner).await.unwrap();

        let mut details = conf();
        details.name = "Hijacked".to_string();
        let result = repo.update(created.id, details, other).await;
        assert!(matches!(result, Err(EventHubError::Forbidden(_))));

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_event() {
        let (db, owner, _) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone());

        let result = repo.update(EventId::new(7), conf(), owner).await;
        assert!(matches!(result, Err(EventHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_forbid_update_of_ownerless_event() {
        let (db, owner, _) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone());
        sqlx::query(
            "INSERT INTO events (name, description, location, dateTime, user_id) VALUES ('Old', 'd', 'l', '2024-05-01 09:00:00+00:00', NULL)",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let result = repo.update(EventId::new(1), conf(), owner).await;
        assert!(matches!(result, Err(EventHubError::Forbidden(_))));
    }

    #[tokio::test]
    async fn should_read_rows_written_in_legacy_timestamp_layout() {
        let (db, owner, _) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone());
        sqlx::query(
            "INSERT INTO events (name, description, location, dateTime, user_id) VALUES ('Conf', 'desc', 'NYC', '2025-01-01 10:00:00+00:00', ?)",
        )
        .bind(owner.as_i64())
        .execute(db.pool())
        .await
        .unwrap();

        let fetched = repo.get_by_id(EventId::new(1)).await.unwrap().unwrap();
        assert_eq!(fetched.details(), conf());
    }

    #[tokio::test]
    async fn should_delete_event_when_requested_by_owner() {
        let (db, owner, _) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone());
        let created = repo.create(conf(), owner).await.unwrap();

        repo.delete(created.id, owner).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_event() {
        let (db, owner, _) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone());

        let result = repo.delete(EventId::new(3), owner).await;
        assert!(matches!(result, Err(EventHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_forbid_delete_by_non_owner_and_keep_registrations() {
        let (db, owner, other) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone());
        let created = repo.create(conf(), owner).await.unwrap();
        register(&db, created.id, other).await;

        let result = repo.delete(created.id, other).await;
        assert!(matches!(result, Err(EventHubError::Forbidden(_))));
        assert!(repo.get_by_id(created.id).await.unwrap().is_some());
        assert_eq!(registration_count(&db, created.id).await, 1);
    }

    #[tokio::test]
    async fn should_cascade_registrations_when_policy_is_cascade() {
        let (db, owner, other) = setup().await;
        let repo = SqliteEventRepository::new(db.pool().clone())
            .with_delete_policy(DeletePolicy::Cascade);
        let created = repo.create(conf(), owner).await.unwrap();
        let kept = repo.create(conf(), owner).await.unwrap();
        register(&db, created.id, owner).await;
        register(&db, created.id, other).await;
        register(&db, kept.id, other).await;

        repo.delete(created.id, owner).await.unwrap();

        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert_eq!(registration_count(&db, created.id).await, 0);
        assert_eq!(registration_count(&db, kept.id).await, 1);
    }

    #[tokio::test]
    async fn should_reject_delete_with_registrations_when_policy_is_reject() {
        let (db, owner, other) = setup().await;
        let repo =
            SqliteEventRepository::new(db.pool().clone()).with_delete_policy(DeletePolicy::Reject);
        let created = repo.create(conf(), owner).await.unwrap();
        register(&db, created.id, other).await;

        let result = repo.delete(created.id, owner).await;
        assert!(matches!(
            result,
            Err(EventHubError::ConflictingDependents { registrations: 1, .. })
        ));
        assert!(repo.get_by_id(created.id).await.unwrap().is_some());
        assert_eq!(registration_count(&db, created.id).await, 1);
    }

    #[tokio::test]
    async fn should_retry_delete_when_registrations_are_gone_after_guarded_delete() {
        let (db, owner, _) = setup().await;
        let repo =
            SqliteEventRepository::new(db.pool().clone()).with_delete_policy(DeletePolicy::Reject);
        let created = repo.create(conf(), owner).await.unwrap();

        // Make the first guarded delete touch nothing, as if a registration
        // blocked it and was removed right after.
        sqlx::raw_sql(
            r"
            CREATE TABLE skip_once (x INTEGER);
            INSERT INTO skip_once VALUES (1);
            CREATE TRIGGER skip_first_delete BEFORE DELETE ON events
            WHEN EXISTS (SELECT 1 FROM skip_once)
            BEGIN
                DELETE FROM skip_once;
                SELECT RAISE(IGNORE);
            END;
            ",
        )
        .execute(db.pool())
        .await
        .unwrap();

        repo.delete(created.id, owner).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_delete_unreferenced_event_when_policy_is_reject() {
        let (db, owner, _) = setup().await;
        let repo =
            SqliteEventRepository::new(db.pool().clone()).with_delete_policy(DeletePolicy::Reject);
        let created = repo.create(conf(), owner).await.unwrap();

        repo.delete(created.id, owner).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
