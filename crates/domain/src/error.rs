//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`EventHubError`] via `From`, so a handler can always tell which kind of
//! failure happened.

use crate::id::{EventId, UserId};

/// Top-level error returned by services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum EventHubError {
    /// Malformed or missing input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced row does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A user with this email is already registered.
    #[error("a user with email {email} already exists")]
    DuplicateEmail { email: String },

    /// The requester does not own the event it tries to modify.
    #[error(transparent)]
    Forbidden(#[from] ForbiddenError),

    /// The user already holds a registration for the event.
    #[error("user {user_id} is already registered for event {event_id}")]
    AlreadyRegistered { event_id: EventId, user_id: UserId },

    /// The event still has registrations and the delete policy forbids
    /// removing them.
    #[error("event {event_id} still has {registrations} registration(s)")]
    ConflictingDependents {
        event_id: EventId,
        registrations: u64,
    },

    /// Authentication failed.
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),

    /// Any other infrastructure failure (hashing, token signing, …).
    #[error("internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

/// Input validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("`{0}` is not a valid email address")]
    InvalidEmail(String),

    #[error("`{0}` is not a valid timestamp")]
    InvalidTimestamp(String),

    #[error("`{0}` is not a valid identifier")]
    InvalidId(String),

    #[error("could not parse request data: {0}")]
    MalformedBody(String),
}

/// A lookup that matched no row.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// An ownership check that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("user {user_id} is not allowed to {action} event {event_id}")]
pub struct ForbiddenError {
    pub action: &'static str,
    pub event_id: EventId,
    pub user_id: UserId,
}

/// Authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("missing authentication token")]
    MissingToken,

    #[error("invalid or expired authentication token")]
    InvalidToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_with_from() {
        let err: EventHubError = ValidationError::EmptyField("name").into();
        assert!(matches!(
            err,
            EventHubError::Validation(ValidationError::EmptyField("name"))
        ));
    }

    #[test]
    fn should_describe_not_found_error() {
        let err = NotFoundError {
            entity: "Event",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "Event 42 not found");
    }

    #[test]
    fn should_describe_forbidden_error() {
        let err: EventHubError = ForbiddenError {
            action: "delete",
            event_id: EventId::new(3),
            user_id: UserId::new(7),
        }
        .into();
        assert_eq!(err.to_string(), "user 7 is not allowed to delete event 3");
    }
}
