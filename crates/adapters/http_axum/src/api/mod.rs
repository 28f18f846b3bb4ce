//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod events;
#[allow(clippy::missing_errors_doc)]
pub mod registrations;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, post};

use eventhub_app::ports::{
    EventRepository, PasswordHasher, RegistrationRepository, TokenIssuer, UserRepository,
};
use eventhub_domain::error::ValidationError;
use eventhub_domain::id::EventId;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<UR, ER, RR, H, T>() -> Router<AppState<UR, ER, RR, H, T>>
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    Router::new()
        // Accounts
        .route("/signup", post(users::sign_up::<UR, ER, RR, H, T>))
        .route("/login", post(users::log_in::<UR, ER, RR, H, T>))
        // Events
        .route(
            "/events",
            get(events::list::<UR, ER, RR, H, T>).post(events::create::<UR, ER, RR, H, T>),
        )
        .route(
            "/events/{id}",
            get(events::get::<UR, ER, RR, H, T>)
                .put(events::update::<UR, ER, RR, H, T>)
                .delete(events::delete::<UR, ER, RR, H, T>),
        )
        // Registrations
        .route(
            "/events/{id}/register",
            post(registrations::register::<UR, ER, RR, H, T>)
                .get(registrations::status::<UR, ER, RR, H, T>)
                .delete(registrations::unregister::<UR, ER, RR, H, T>),
        )
}

/// Parse the `{id}` path segment of an event route.
pub(crate) fn parse_event_id(raw: &str) -> Result<EventId, ValidationError> {
    EventId::from_str(raw).map_err(|_| ValidationError::InvalidId(raw.to_string()))
}
