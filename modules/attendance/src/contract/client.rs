use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::error::AttendanceError;
use crate::contract::model::{LogEntry, NewUser, ToggleOutcome, User, UserPatch};

/// Public API trait for the attendance module that consumers can use.
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    /// List all users, sanitized, in store order.
    async fn list_users(&self) -> Result<Vec<User>, AttendanceError>;

    /// Create a new user; fails on a duplicate username.
    async fn add_user(&self, candidate: NewUser) -> Result<User, AttendanceError>;

    /// Merge a partial update onto an existing user.
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, AttendanceError>;

    /// Remove a user; a no-op if the id is unknown.
    async fn delete_user(&self, id: Uuid) -> Result<(), AttendanceError>;

    /// Validate credentials and publish the session identity.
    async fn login(&self, username: &str, password: &str) -> Result<User, AttendanceError>;

    /// Clear the session identity.
    fn logout(&self);

    /// Flip the current user's attendance status, recording one audit entry.
    async fn toggle(&self) -> ToggleOutcome;

    /// List audit entries, newest first.
    async fn list_logs(&self) -> Result<Vec<LogEntry>, AttendanceError>;

    /// The currently published session identity, if any.
    fn current_session(&self) -> Option<User>;

    /// Revalidate a previously stored session identity against the current
    /// directory; stale identities are discarded silently.
    async fn restore_session(&self) -> Result<Option<User>, AttendanceError>;
}
