//! JSON REST handlers for events.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use eventhub_app::ports::{
    EventRepository, PasswordHasher, RegistrationRepository, TokenIssuer, UserRepository,
};
use eventhub_domain::error::EventHubError;
use eventhub_domain::event::{Event, EventDetails};

use super::parse_event_id;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating or replacing an event.
///
/// Missing fields deserialize as empty strings so that the domain reports
/// which one is missing.
#[derive(Debug, Default, Deserialize)]
pub struct EventRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, rename = "dateTime")]
    pub date_time: String,
}

impl EventRequest {
    fn into_details(self) -> Result<EventDetails, EventHubError> {
        EventDetails::from_raw(self.name, self.description, self.location, &self.date_time)
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Event>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<Event>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Event>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/events`
pub async fn list<UR, ER, RR, H, T>(
    State(state): State<AppState<UR, ER, RR, H, T>>,
) -> Result<ListResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    let events = state.event_service.list_events().await?;
    Ok(ListResponse::Ok(Json(events)))
}

/// `GET /api/events/{id}`
pub async fn get<UR, ER, RR, H, T>(
    State(state): State<AppState<UR, ER, RR, H, T>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    let event_id = parse_event_id(&id)?;
    let event = state.event_service.get_event(event_id).await?;
    Ok(GetResponse::Ok(Json(event)))
}

/// `POST /api/events`
pub async fn create<UR, ER, RR, H, T>(
    State(state): State<AppState<UR, ER, RR, H, T>>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    let Json(req) = body?;
    let details = req.into_details()?;
    let created = state.event_service.create_event(details, user_id).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/events/{id}`
pub async fn update<UR, ER, RR, H, T>(
    State(state): State<AppState<UR, ER, RR, H, T>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Result<GetResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    let event_id = parse_event_id(&id)?;
    let Json(req) = body?;
    let details = req.into_details()?;
    let updated = state
        .event_service
        .update_event(event_id, details, user_id)
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/events/{id}`
pub async fn delete<UR, ER, RR, H, T>(
    State(state): State<AppState<UR, ER, RR, H, T>>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    let event_id = parse_event_id(&id)?;
    state.event_service.delete_event(event_id, user_id).await?;
    Ok(DeleteResponse::NoContent)
}
