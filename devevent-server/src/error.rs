//! Error types for devevent-server

use thiserror::Error;
use uuid::Uuid;

use crate::db::{ConnectError, StoreError};
use crate::media::UploadError;
use crate::models::FieldErrors;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing configuration or unreachable store
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("validation failed: {0}")]
    Validation(#[from] FieldErrors),

    /// Booking points at an event that does not exist
    #[error("referenced event does not exist: {event_id}")]
    Reference { event_id: Uuid },

    /// Looking up the referenced event failed
    #[error("error validating event reference: {0}")]
    ReferenceLookup(#[source] StoreError),

    /// Unique constraint violated in the store
    #[error("{resource} with this {field} already exists")]
    Conflict {
        resource: &'static str,
        field: String,
    },

    #[error(transparent)]
    Store(StoreError),

    #[error("image upload failed: {0}")]
    Upload(#[from] UploadError),
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict { resource, field } => Self::Conflict { resource, field },
            other => Self::Store(other),
        }
    }
}
