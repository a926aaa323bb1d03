use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access level of a directory member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

/// Current attendance state of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    CheckedIn,
    CheckedOut,
}

impl AttendanceStatus {
    /// The logical complement: the state one toggle away.
    pub fn toggled(self) -> Self {
        match self {
            Self::CheckedIn => Self::CheckedOut,
            Self::CheckedOut => Self::CheckedIn,
        }
    }
}

/// Kind of an audit log event, derived from the post-transition status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    In,
    Out,
}

impl From<AttendanceStatus> for EventKind {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::CheckedIn => Self::In,
            AttendanceStatus::CheckedOut => Self::Out,
        }
    }
}

/// Coordinates reported by the geolocation collaborator. Transient: persisted
/// only inside a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeolocationData {
    pub latitude: f64,
    pub longitude: f64,
}

/// Sanitized user model for consumers outside the directory boundary.
/// There is deliberately no password field on this type.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    pub username: String,
    pub role: Role,
    pub status: AttendanceStatus,
    pub last_check_in: Option<DateTime<Utc>>,
}

/// Data for creating a new user. New users always start checked out.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub display_name: String,
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Partial update data for a user.
///
/// An empty or absent `password` retains the stored one; the outer/inner
/// option on `last_check_in` distinguishes "leave unchanged" from "set to
/// None".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AttendanceStatus>,
    pub last_check_in: Option<Option<DateTime<Utc>>>,
}

/// Immutable audit record of one attendance transition.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: String,
    pub user_id: Uuid,
    pub user_display_name: String,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub ip: String,
    pub location: Option<GeolocationData>,
    pub location_error: Option<String>,
}

/// A log entry minus its identifier; the audit service assigns one on append.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub user_id: Uuid,
    pub user_display_name: String,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub ip: String,
    pub location: Option<GeolocationData>,
    pub location_error: Option<String>,
}

/// Result of one toggle attempt. Guard rejections and post-guard failures
/// both surface here as non-success outcomes rather than errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub success: bool,
    pub message: String,
    /// The republished session identity; present only on success.
    pub user: Option<User>,
}

impl ToggleOutcome {
    pub fn succeeded(user: User, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            user: Some(user),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user: None,
        }
    }
}
