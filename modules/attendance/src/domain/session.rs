//! Session storage and startup revalidation.
//!
//! The slot holds one sanitized user serialized as JSON text, mirroring
//! browser session storage. With a backing path the text is written through
//! to disk so a later process start can revalidate it; without one the slot
//! is process-local (tests).

use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::contract::model::User;
use crate::domain::audit::AuditLogService;
use crate::domain::directory::DirectoryService;
use crate::domain::error::DomainError;
use crate::infra::storage::entity::SessionRecord;

pub struct SessionStore {
    slot: Mutex<Option<String>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Process-local slot with no persistence.
    pub fn in_memory() -> Self {
        Self {
            slot: Mutex::new(None),
            path: None,
        }
    }

    /// Slot backed by a file; any previously stored text is picked up now
    /// and judged at revalidation time.
    pub fn at_path(path: PathBuf) -> Self {
        let stored = match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(error = %e, "Could not read session file; starting without a session");
                None
            }
        };
        Self {
            slot: Mutex::new(stored),
            path: Some(path),
        }
    }

    /// The currently published identity, if the slot holds a parsable one.
    pub fn current(&self) -> Option<User> {
        let slot = self.slot.lock();
        let text = slot.as_ref()?;
        match serde_json::from_str::<SessionRecord>(text) {
            Ok(record) => Some(record.into()),
            Err(e) => {
                warn!(error = %e, "Discarding unparsable session text");
                None
            }
        }
    }

    /// Publish a sanitized user as the session identity.
    pub fn publish(&self, user: &User) -> Result<(), DomainError> {
        let record = SessionRecord::from(user);
        let text = serde_json::to_string(&record)
            .map_err(|e| DomainError::session(e.to_string()))?;

        if let Some(path) = &self.path {
            std::fs::write(path, &text).map_err(|e| DomainError::session(e.to_string()))?;
        }
        *self.slot.lock() = Some(text);
        Ok(())
    }

    /// Clear the slot (explicit logout or a discarded stale identity).
    pub fn clear(&self) {
        *self.slot.lock() = None;
        if let Some(path) = &self.path {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(error = %e, "Could not remove session file");
                }
            }
        }
    }
}

/// Application-start revalidation.
///
/// Loads the directory and the audit log concurrently; both must complete
/// before the caller may proceed, and either failure is fatal to startup. A
/// stored identity survives only if its id is still present in the fresh
/// directory snapshot; otherwise it is discarded silently.
#[instrument(name = "attendance.session.revalidate", skip_all)]
pub async fn revalidate(
    directory: &DirectoryService,
    audit: &AuditLogService,
    sessions: &SessionStore,
) -> Result<Option<User>, DomainError> {
    let (users, logs) = tokio::join!(directory.list_users(), audit.list_logs());
    let users = users.map_err(|e| DomainError::data_load(e.to_string()))?;
    let logs = logs.map_err(|e| DomainError::data_load(e.to_string()))?;
    debug!(users = users.len(), logs = logs.len(), "Startup data loaded");

    let Some(stored) = sessions.current() else {
        return Ok(None);
    };

    match users.into_iter().find(|u| u.id == stored.id) {
        Some(fresh) => {
            // Re-publish the directory's view, not the stored snapshot: the
            // record may have changed since the session was written.
            sessions.publish(&fresh)?;
            info!(user_id = %fresh.id, "Restored session");
            Ok(Some(fresh))
        }
        None => {
            sessions.clear();
            debug!("Stored session identity no longer in directory; discarded");
            Ok(None)
        }
    }
}
