use thiserror::Error;
use uuid::Uuid;

use crate::contract::error::AttendanceError;

/// Domain-specific errors using thiserror.
///
/// Unlike the contract error, this type keeps the distinguished failure kind
/// (storage vs. data-load vs. business rule) so it can be logged for
/// diagnostics before being collapsed at the module boundary.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("username '{username}' already exists")]
    DuplicateUsername { username: String },

    #[error("user not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("operation already in progress")]
    OperationInProgress,

    #[error("data load failed: {message}")]
    DataLoad { message: String },

    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("session storage error: {message}")]
    Session { message: String },
}

impl DomainError {
    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername {
            username: username.into(),
        }
    }

    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn data_load(message: impl Into<String>) -> Self {
        Self::DataLoad {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }
}

impl From<snapstore::StoreError> for DomainError {
    fn from(e: snapstore::StoreError) -> Self {
        Self::storage(e.to_string())
    }
}

/// Collapse domain details into the errors exposed past the module boundary.
impl From<DomainError> for AttendanceError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidCredentials => AttendanceError::InvalidCredentials,
            DomainError::DuplicateUsername { username } => {
                AttendanceError::DuplicateUsername { username }
            }
            DomainError::UserNotFound { id } => AttendanceError::UserNotFound { id },
            DomainError::OperationInProgress => AttendanceError::OperationInProgress,
            DomainError::DataLoad { message } => AttendanceError::DataLoad { message },
            DomainError::Storage { .. } | DomainError::Session { .. } => AttendanceError::Internal,
        }
    }
}
