//! Registration service — use-cases for attending events.

use eventhub_domain::error::EventHubError;
use eventhub_domain::id::{EventId, UserId};
use eventhub_domain::registration::Registration;

use crate::ports::RegistrationRepository;

/// Application service for event registrations.
pub struct RegistrationService<R> {
    repo: R,
}

impl<R: RegistrationRepository> RegistrationService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register `user_id` for `event_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::NotFound`] or
    /// [`EventHubError::AlreadyRegistered`] from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn register(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<Registration, EventHubError> {
        self.repo.register(event_id, user_id).await
    }

    /// Cancel the registration of `user_id` for `event_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EventHubError::NotFound`] when the user was not registered.
    #[tracing::instrument(skip(self))]
    pub async fn unregister(&self, event_id: EventId, user_id: UserId) -> Result<(), EventHubError> {
        self.repo.unregister(event_id, user_id).await
    }

    /// Whether `user_id` is registered for `event_id`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn is_registered(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> Result<bool, EventHubError> {
        self.repo.is_registered(event_id, user_id).await
    }
}
