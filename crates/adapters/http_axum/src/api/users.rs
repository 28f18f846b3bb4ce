//! JSON REST handlers for sign-up and login.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use eventhub_app::ports::{
    EventRepository, PasswordHasher, RegistrationRepository, TokenIssuer, UserRepository,
};
use eventhub_domain::user::{Credentials, User};

use crate::error::ApiError;
use crate::state::AppState;

/// Body returned by a successful login.
#[derive(Serialize)]
pub struct TokenBody {
    pub token: String,
}

/// Possible responses from the sign-up endpoint.
pub enum SignUpResponse {
    Created(Json<User>),
}

impl IntoResponse for SignUpResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the login endpoint.
pub enum LogInResponse {
    Ok(Json<TokenBody>),
}

impl IntoResponse for LogInResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/signup`
pub async fn sign_up<UR, ER, RR, H, T>(
    State(state): State<AppState<UR, ER, RR, H, T>>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<SignUpResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    let Json(credentials) = body?;
    let user = state.user_service.sign_up(credentials).await?;
    Ok(SignUpResponse::Created(Json(user)))
}

/// `POST /api/login`
pub async fn log_in<UR, ER, RR, H, T>(
    State(state): State<AppState<UR, ER, RR, H, T>>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<LogInResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    let Json(credentials) = body?;
    let token = state.user_service.log_in(credentials).await?;
    Ok(LogInResponse::Ok(Json(TokenBody { token })))
}
