//! Error taxonomy for the signup data path.
//!
//! A [`ClientError`] is always returned to the caller as-is. A
//! [`StorageUnavailable`] is only ever seen by the service, which answers it
//! by switching to the in-memory fallback store.

use thiserror::Error;

/// User-correctable failures, surfaced verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Activity not found")]
    ActivityNotFound,

    #[error("Student is already signed up")]
    AlreadySignedUp,

    #[error("Student is not signed up for this activity")]
    NotSignedUp,
}

/// Reasons the persistent store could not serve a request.
#[derive(Debug, Error)]
pub enum StorageUnavailable {
    /// No rows at all; the listing falls back to seed data.
    #[error("persistent store has no activities")]
    Empty,

    /// The named activity has no row.
    #[error("activity {0:?} is not in the persistent store")]
    NotPersisted(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of an attempt against the persistent store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Unavailable(#[from] StorageUnavailable),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(StorageUnavailable::Database(e))
    }
}
