use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to consumers of the module.
#[derive(Error, Debug, Clone)]
pub enum AttendanceError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username '{username}' is already taken")]
    DuplicateUsername { username: String },

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Another attendance operation is already in progress")]
    OperationInProgress,

    #[error("Failed to load attendance data: {message}")]
    DataLoad { message: String },

    #[error("Internal error")]
    Internal,
}

impl AttendanceError {
    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

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

    pub fn internal() -> Self {
        Self::Internal
    }
}
