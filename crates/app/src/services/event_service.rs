//! Event service — use-cases for managing events.

use eventhub_domain::error::{EventHubError, NotFoundError};
use eventhub_domain::event::{Event, EventDetails};
use eventhub_domain::id::{EventId, UserId};

use crate::ports::EventRepository;

/// Application service for event CRUD operations.
pub struct EventService<R> {
    repo: R,
}

impl<R: EventRepository> EventService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new event owned by `owner` after validating its details.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Validation`] if invariants fail, or an error
    /// propagated from the repository.
    #[tracing::instrument(skip(self, details), fields(event_name = %details.name))]
    pub async fn create_event(
        &self,
        details: EventDetails,
        owner: UserId,
    ) -> Result<Event, EventHubError> {
        details.validate()?;
        self.repo.create(details, owner).await
    }

    /// Look up an event by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::NotFound`] when no event with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_event(&self, id: EventId) -> Result<Event, EventHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Event",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all events.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_events(&self) -> Result<Vec<Event>, EventHubError> {
        self.repo.get_all().await
    }

    /// Replace an event's details on behalf of `requester`.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::Validation`] if invariants fail,
    /// [`EventHubError::NotFound`] or [`EventHubError::Forbidden`] from the
    /// repository.
    #[tracing::instrument(skip(self, details))]
    pub async fn update_event(
        &self,
        id: EventId,
        details: EventDetails,
        requester: UserId,
    ) -> Result<Event, EventHubError> {
        details.validate()?;
        self.repo.update(id, details, requester).await
    }

    /// Delete an event on behalf of `requester`.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::NotFound`], [`EventHubError::Forbidden`] or
    /// [`EventHubError::ConflictingDependents`] from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_event(&self, id: EventId, requester: UserId) -> Result<(), EventHubError> {
        self.repo.delete(id, requester).await?;
        tracing::info!(event_id = %id, "event deleted");
        Ok(())
    }
}
