//! Storage-specific error type wrapping sqlx errors.

use eventhub_domain::error::EventHubError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The database could not be opened or its schema could not be created.
    ///
    /// Only produced at startup; the process must not continue with a
    /// partially initialized store.
    #[error("storage unavailable at {url}")]
    Unavailable {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    pub(crate) fn unavailable(url: &str, source: sqlx::Error) -> Self {
        Self::Unavailable {
            url: url.to_string(),
            source,
        }
    }
}

impl From<StorageError> for EventHubError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
