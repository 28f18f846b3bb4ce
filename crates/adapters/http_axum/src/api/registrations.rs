//! JSON REST handlers for event registrations.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use eventhub_app::ports::{
    EventRepository, PasswordHasher, RegistrationRepository, TokenIssuer, UserRepository,
};
use eventhub_domain::registration::Registration;

use super::parse_event_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Body returned by the status endpoint.
#[derive(Serialize)]
pub struct StatusBody {
    pub registered: bool,
}

/// Possible responses from the register endpoint.
pub enum RegisterResponse {
    Created(Json<Registration>),
}

impl IntoResponse for RegisterResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the status endpoint.
pub enum StatusResponse {
    Ok(Json<StatusBody>),
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the unregister endpoint.
pub enum UnregisterResponse {
    NoContent,
}

impl IntoResponse for UnregisterResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `POST /api/events/{id}/register`
pub async fn register<UR, ER, RR, H, T>(
    State(state): State<AppState<UR, ER, RR, H, T>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<RegisterResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    let event_id = parse_event_id(&id)?;
    let registration = state
        .registration_service
        .register(event_id, user_id)
        .await?;
    Ok(RegisterResponse::Created(Json(registration)))
}

/// `GET /api/events/{id}/register`
pub async fn status<UR, ER, RR, H, T>(
    State(state): State<AppState<UR, ER, RR, H, T>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    let event_id = parse_event_id(&id)?;
    let registered = state
        .registration_service
        .is_registered(event_id, user_id)
        .await?;
    Ok(StatusResponse::Ok(Json(StatusBody { registered })))
}

/// `DELETE /api/events/{id}/register`
pub async fn unregister<UR, ER, RR, H, T>(
    State(state): State<AppState<UR, ER, RR, H, T>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<UnregisterResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    let event_id = parse_event_id(&id)?;
    state
        .registration_service
        .unregister(event_id, user_id)
        .await?;
    Ok(UnregisterResponse::NoContent)
}
