//! Append-only audit log of attendance events.

use chrono::{DateTime, Utc};
use snapstore::Store;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{LogEntry, NewLogEntry};
use crate::domain::error::DomainError;
use crate::infra::storage::entity::{self, LogRecord};

/// Audit log service. Entries are immutable once appended: there is no
/// update or delete operation on this service, by contract.
#[derive(Clone)]
pub struct AuditLogService {
    store: Store,
}

impl AuditLogService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// List entries newest first, as persisted. Insertion order IS the
    /// recency order; no re-sorting happens here.
    #[instrument(name = "attendance.audit.list_logs", skip(self))]
    pub async fn list_logs(&self) -> Result<Vec<LogEntry>, DomainError> {
        debug!("Listing audit log");
        let records = entity::load_logs(&self.store).await?;
        Ok(records.into_iter().map(LogEntry::from).collect())
    }

    /// Assign a fresh identifier and prepend the completed entry, keeping
    /// the stored sequence newest-first by position.
    #[instrument(
        name = "attendance.audit.append_log",
        skip(self, draft),
        fields(user_id = %draft.user_id, kind = ?draft.kind)
    )]
    pub async fn append_log(&self, draft: NewLogEntry) -> Result<LogEntry, DomainError> {
        let mut records = entity::load_logs(&self.store).await?;

        let record = LogRecord::from_draft(generate_log_id(draft.timestamp), draft);
        records.insert(0, record.clone());
        entity::save_logs(&self.store, &records).await?;

        info!(log_id = %record.id, "Appended audit entry");
        Ok(record.into())
    }
}

/// Synthetic identifier embedding the creation-time millisecond component,
/// with a random suffix to keep same-instant entries distinct.
fn generate_log_id(at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("log-{}-{}", at.timestamp_millis(), &suffix[..8])
}
