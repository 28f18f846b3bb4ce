//! Request authentication.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use eventhub_app::ports::{
    EventRepository, PasswordHasher, RegistrationRepository, TokenIssuer, UserRepository,
};
use eventhub_domain::error::AuthError;
use eventhub_domain::id::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// The user a request was authenticated as.
///
/// Reads the `Authorization` header. Both `Bearer <token>` and a bare token
/// are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub UserId);

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let value = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();
    Ok(token)
}

impl<UR, ER, RR, H, T> FromRequestParts<AppState<UR, ER, RR, H, T>> for AuthUser
where
    UR: UserRepository + Send + Sync + 'static,
    ER: EventRepository + Send + Sync + 'static,
    RR: RegistrationRepository + Send + Sync + 'static,
    H: PasswordHasher + Send + Sync + 'static,
    T: TokenIssuer + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<UR, ER, RR, H, T>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).map_err(eventhub_domain::error::EventHubError::from)?;
        let user_id = state.user_service.authenticate(token).inspect_err(|err| {
            tracing::debug!(error = %err, "request not authenticated");
        })?;
        Ok(Self(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn should_strip_bearer_scheme() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc.def"))).unwrap(), "abc.def");
    }

    #[test]
    fn should_accept_raw_token() {
        assert_eq!(bearer_token(&parts_with(Some("abc.def"))).unwrap(), "abc.def");
    }

    #[test]
    fn should_report_missing_token_without_header() {
        assert_eq!(bearer_token(&parts_with(None)), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(&parts_with(Some("  "))), Err(AuthError::MissingToken));
    }
}
