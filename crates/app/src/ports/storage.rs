//! Storage port — repository traits for persistence.
//!
//! Implementations must not cache rows: every call is a fresh statement
//! against the store, and integrity rules (unique emails, ownership, one
//! registration per pair) are enforced atomically by the implementation.

use std::future::Future;

use eventhub_domain::error::EventHubError;
use eventhub_domain::event::{Event, EventDetails};
use eventhub_domain::id::{EventId, UserId};
use eventhub_domain::registration::Registration;
use eventhub_domain::user::User;

/// Repository for persisting and querying [`User`]s.
pub trait UserRepository {
    /// Insert a new user with an already-hashed password.
    ///
    /// Fails with [`EventHubError::DuplicateEmail`] when the email is taken.
    fn create(
        &self,
        email: String,
        password_hash: String,
    ) -> impl Future<Output = Result<User, EventHubError>> + Send;

    /// Look up a user by login email.
    fn find_by_email(
        &self,
        email: String,
    ) -> impl Future<Output = Result<Option<User>, EventHubError>> + Send;
}

/// Repository for persisting and querying [`Event`]s.
pub trait EventRepository {
    /// Insert a new event owned by `owner`.
    ///
    /// Fails with [`EventHubError::NotFound`] when `owner` does not exist.
    fn create(
        &self,
        details: EventDetails,
        owner: UserId,
    ) -> impl Future<Output = Result<Event, EventHubError>> + Send;

    /// Get all events, ordered by id.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Event>, EventHubError>> + Send;

    /// Get an event by its unique identifier.
    fn get_by_id(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<Option<Event>, EventHubError>> + Send;

    /// Replace the editable fields of an event on behalf of `requester`.
    ///
    /// Fails with [`EventHubError::NotFound`] when the event is absent and
    /// [`EventHubError::Forbidden`] when `requester` is not the owner; the
    /// row is left untouched in both cases.
    fn update(
        &self,
        id: EventId,
        details: EventDetails,
        requester: UserId,
    ) -> impl Future<Output = Result<Event, EventHubError>> + Send;

    /// Delete an event on behalf of `requester`.
    ///
    /// Same authorization rule as [`EventRepository::update`]. Existing
    /// registrations are handled according to the implementation's
    /// [`DeletePolicy`](eventhub_domain::event::DeletePolicy).
    fn delete(
        &self,
        id: EventId,
        requester: UserId,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send;
}

/// Repository for event [`Registration`]s.
pub trait RegistrationRepository {
    /// Register `user_id` for `event_id`.
    ///
    /// Fails with [`EventHubError::NotFound`] when either side is absent and
    /// [`EventHubError::AlreadyRegistered`] when the pair already exists.
    fn register(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Registration, EventHubError>> + Send;

    /// Remove the registration of `user_id` for `event_id`.
    ///
    /// Fails with [`EventHubError::NotFound`] when no registration exists.
    fn unregister(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> impl Future<Output = Result<(), EventHubError>> + Send;

    /// Whether `user_id` is currently registered for `event_id`.
    fn is_registered(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, EventHubError>> + Send;
}
