//! Shared application state for axum handlers.

use std::sync::Arc;

use eventhub_app::ports::{
    EventRepository, PasswordHasher, RegistrationRepository, TokenIssuer, UserRepository,
};
use eventhub_app::services::event_service::EventService;
use eventhub_app::services::registration_service::RegistrationService;
use eventhub_app::services::user_service::UserService;

/// Application state shared across all axum handlers.
///
/// Generic over the three repositories, the password hasher and the token
/// issuer to avoid dynamic dispatch. `Clone` is implemented manually so the
/// underlying types themselves do not need to be `Clone`; only the `Arc`
/// wrappers are cloned.
pub struct AppState<UR, ER, RR, H, T> {
    /// Sign-up, login and token checks.
    pub user_service: Arc<UserService<UR, H, T>>,
    /// Event CRUD service.
    pub event_service: Arc<EventService<ER>>,
    /// Event registration service.
    pub registration_service: Arc<RegistrationService<RR>>,
}

impl<UR, ER, RR, H, T> Clone for AppState<UR, ER, RR, H, T> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            event_service: Arc::clone(&self.event_service),
            registration_service: Arc::clone(&self.registration_service),
        }
    }
}

impl<UR, ER, RR, H, T> AppState<UR, ER, RR, H, T>
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        user_service: UserService<UR, H, T>,
        event_service: EventService<ER>,
        registration_service: RegistrationService<RR>,
    ) -> Self {
        Self {
            user_service: Arc::new(user_service),
            event_service: Arc::new(event_service),
            registration_service: Arc::new(registration_service),
        }
    }
}
