use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::AttendanceApi,
    error::AttendanceError,
    model::{LogEntry, NewUser, ToggleOutcome, User, UserPatch},
};
use crate::domain::{
    attendance::AttendanceService, audit::AuditLogService, auth::AuthService,
    directory::DirectoryService, session::{self, SessionStore},
};

/// Local implementation of the AttendanceApi trait that delegates to the
/// domain services, collapsing domain errors into the contract taxonomy.
pub struct LocalAttendanceClient {
    directory: Arc<DirectoryService>,
    auth: Arc<AuthService>,
    audit: Arc<AuditLogService>,
    attendance: Arc<AttendanceService>,
    sessions: Arc<SessionStore>,
}

impl LocalAttendanceClient {
    pub fn new(
        directory: Arc<DirectoryService>,
        auth: Arc<AuthService>,
        audit: Arc<AuditLogService>,
        attendance: Arc<AttendanceService>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            directory,
            auth,
            audit,
            attendance,
            sessions,
        }
    }
}

#[async_trait]
impl AttendanceApi for LocalAttendanceClient {
    async fn list_users(&self) -> Result<Vec<User>, AttendanceError> {
        self.directory.list_users().await.map_err(Into::into)
    }

    async fn add_user(&self, candidate: NewUser) -> Result<User, AttendanceError> {
        self.directory.add_user(candidate).await.map_err(Into::into)
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, AttendanceError> {
        self.directory
            .update_user(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), AttendanceError> {
        self.directory.delete_user(id).await.map_err(Into::into)
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AttendanceError> {
        self.auth.login(username, password).await.map_err(Into::into)
    }

    fn logout(&self) {
        self.auth.logout();
    }

    async fn toggle(&self) -> ToggleOutcome {
        self.attendance.toggle().await
    }

    async fn list_logs(&self) -> Result<Vec<LogEntry>, AttendanceError> {
        self.audit.list_logs().await.map_err(Into::into)
    }

    fn current_session(&self) -> Option<User> {
        self.sessions.current()
    }

    async fn restore_session(&self) -> Result<Option<User>, AttendanceError> {
        session::revalidate(&self.directory, &self.audit, &self.sessions)
            .await
            .map_err(Into::into)
    }
}
