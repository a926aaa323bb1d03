//! Persisted records and the collection helpers over the snapshot store.
//!
//! Records are the storage-side representation: `UserRecord` carries the
//! password and must never cross the contract boundary unmapped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snapstore::Store;
use uuid::Uuid;

use crate::contract::model::{
    AttendanceStatus, EventKind, GeolocationData, NewLogEntry, NewUser, Role,
};

/// Users collection key.
pub const USERS: &str = "users";
/// Logs collection key.
pub const LOGS: &str = "logs";

/// Stored user record, password included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub display_name: String,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub status: AttendanceStatus,
    pub last_check_in: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Build the stored record for a new directory member.
    pub fn create(candidate: NewUser) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: candidate.display_name,
            username: candidate.username,
            password: candidate.password,
            role: candidate.role,
            status: AttendanceStatus::CheckedOut,
            last_check_in: None,
        }
    }
}

/// Stored audit record. Timestamps serialize as RFC 3339 text and are
/// converted back to `DateTime<Utc>` on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: String,
    pub user_id: Uuid,
    pub user_display_name: String,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
    pub ip: String,
    pub location: Option<GeolocationData>,
    pub location_error: Option<String>,
}

impl LogRecord {
    /// Complete a draft entry with its generated identifier.
    pub fn from_draft(id: String, draft: NewLogEntry) -> Self {
        Self {
            id,
            user_id: draft.user_id,
            user_display_name: draft.user_display_name,
            timestamp: draft.timestamp,
            kind: draft.kind,
            ip: draft.ip,
            location: draft.location,
            location_error: draft.location_error,
        }
    }
}

/// Serialized form of the session slot: one sanitized user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub display_name: String,
    pub username: String,
    pub role: Role,
    pub status: AttendanceStatus,
    pub last_check_in: Option<DateTime<Utc>>,
}

/// Load the full users collection.
pub async fn load_users(store: &Store) -> snapstore::Result<Vec<UserRecord>> {
    store.load(USERS).await
}

/// Replace the full users collection.
pub async fn save_users(store: &Store, users: &[UserRecord]) -> snapstore::Result<()> {
    store.save(USERS, users).await
}

/// Load the full logs collection, newest first as persisted.
pub async fn load_logs(store: &Store) -> snapstore::Result<Vec<LogRecord>> {
    store.load(LOGS).await
}

/// Replace the full logs collection.
pub async fn save_logs(store: &Store, logs: &[LogRecord]) -> snapstore::Result<()> {
    store.save(LOGS, logs).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_record_create_starts_checked_out() {
        let rec = UserRecord::create(NewUser {
            display_name: "Dana Smith".to_string(),
            username: "dana".to_string(),
            password: "dana123".to_string(),
            role: Role::Employee,
        });

        assert_eq!(rec.status, AttendanceStatus::CheckedOut);
        assert!(rec.last_check_in.is_none());
        assert_eq!(rec.password, "dana123");
    }

    #[test]
    fn log_record_serializes_timestamp_as_rfc3339_text() {
        let rec = LogRecord {
            id: "log-0-abc".to_string(),
            user_id: Uuid::new_v4(),
            user_display_name: "Dana Smith".to_string(),
            timestamp: "2024-05-01T08:30:00Z".parse().unwrap(),
            kind: EventKind::In,
            ip: "10.0.0.1".to_string(),
            location: None,
            location_error: None,
        };

        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("2024-05-01T08:30:00Z"));

        let back: LogRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn role_and_status_use_stable_wire_names() {
        let rec = UserRecord::create(NewUser {
            display_name: "Dana Smith".to_string(),
            username: "dana".to_string(),
            password: "dana123".to_string(),
            role: Role::Admin,
        });

        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains(r#""role":"admin""#));
        assert!(json.contains(r#""status":"checked_out""#));
    }
}
