//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use eventhub_domain::error::{EventHubError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`EventHubError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(EventHubError);

impl From<EventHubError> for ApiError {
    fn from(err: EventHubError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::MalformedBody(rejection.body_text()).into()
    }
}

impl ApiError {
    /// The status code this error is reported with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            EventHubError::Validation(_) => StatusCode::BAD_REQUEST,
            EventHubError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            EventHubError::Forbidden(_) => StatusCode::FORBIDDEN,
            EventHubError::NotFound(_) => StatusCode::NOT_FOUND,
            EventHubError::DuplicateEmail { .. }
            | EventHubError::AlreadyRegistered { .. }
            | EventHubError::ConflictingDependents { .. } => StatusCode::CONFLICT,
            EventHubError::Storage(_) | EventHubError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
