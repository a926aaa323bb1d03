//! Conversions between stored records and contract models.
//!
//! Mapping a `UserRecord` to a contract `User` is where the password is
//! dropped; the contract type has no field to carry it.

use crate::contract::model::{LogEntry, User};
use crate::infra::storage::entity::{LogRecord, SessionRecord, UserRecord};

impl From<UserRecord> for User {
    fn from(rec: UserRecord) -> Self {
        Self {
            id: rec.id,
            display_name: rec.display_name,
            username: rec.username,
            role: rec.role,
            status: rec.status,
            last_check_in: rec.last_check_in,
        }
    }
}

impl From<LogRecord> for LogEntry {
    fn from(rec: LogRecord) -> Self {
        Self {
            id: rec.id,
            user_id: rec.user_id,
            user_display_name: rec.user_display_name,
            timestamp: rec.timestamp,
            kind: rec.kind,
            ip: rec.ip,
            location: rec.location,
            location_error: rec.location_error,
        }
    }
}

impl From<&User> for SessionRecord {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name.clone(),
            username: user.username.clone(),
            role: user.role,
            status: user.status,
            last_check_in: user.last_check_in,
        }
    }
}

impl From<SessionRecord> for User {
    fn from(rec: SessionRecord) -> Self {
        Self {
            id: rec.id,
            display_name: rec.display_name,
            username: rec.username,
            role: rec.role,
            status: rec.status,
            last_check_in: rec.last_check_in,
        }
    }
}
