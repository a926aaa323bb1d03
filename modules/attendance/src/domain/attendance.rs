//! The attendance state machine: one check-in/check-out transition.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{instrument, warn};

use crate::contract::model::{
    AttendanceStatus, EventKind, NewLogEntry, ToggleOutcome, User, UserPatch,
};
use crate::domain::audit::AuditLogService;
use crate::domain::directory::DirectoryService;
use crate::domain::error::DomainError;
use crate::domain::ports::{Geolocator, IpLookup, IP_UNAVAILABLE};
use crate::domain::session::SessionStore;

const MSG_NOT_SIGNED_IN: &str = "You must be signed in to record attendance.";
const MSG_IN_PROGRESS: &str = "An attendance update is already in progress.";
const MSG_FAILED: &str = "Could not record attendance. Please try again.";

/// Orchestrates a single toggle: gathers collaborator context, appends the
/// audit entry, persists the updated user, republishes the session.
pub struct AttendanceService {
    directory: Arc<DirectoryService>,
    audit: Arc<AuditLogService>,
    sessions: Arc<SessionStore>,
    ip: Arc<dyn IpLookup>,
    geo: Arc<dyn Geolocator>,
    /// Single-session re-entrancy guard, not a cross-session lock.
    in_flight: AtomicBool,
}

impl AttendanceService {
    pub fn new(
        directory: Arc<DirectoryService>,
        audit: Arc<AuditLogService>,
        sessions: Arc<SessionStore>,
        ip: Arc<dyn IpLookup>,
        geo: Arc<dyn Geolocator>,
    ) -> Self {
        Self {
            directory,
            audit,
            sessions,
            ip,
            geo,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Flip the session user's attendance status.
    ///
    /// Guard rejections return a non-success outcome without any store
    /// access. Post-guard failures are collapsed into one generic message;
    /// the real cause is logged here for diagnostics. The audit append and
    /// the user update are not rolled back relative to each other, so a
    /// failure between them leaves the extra log entry in place.
    #[instrument(name = "attendance.toggle", skip(self))]
    pub async fn toggle(&self) -> ToggleOutcome {
        let Some(current) = self.sessions.current() else {
            return ToggleOutcome::failed(MSG_NOT_SIGNED_IN);
        };
        if self.in_flight.swap(true, Ordering::Acquire) {
            warn!(error = %DomainError::OperationInProgress, "Toggle rejected");
            return ToggleOutcome::failed(MSG_IN_PROGRESS);
        }

        let outcome = match self.run_transition(current).await {
            Ok((user, message)) => ToggleOutcome::succeeded(user, message),
            Err(e) => {
                warn!(error = %e, "Toggle failed");
                ToggleOutcome::failed(MSG_FAILED)
            }
        };

        self.in_flight.store(false, Ordering::Release);
        outcome
    }

    async fn run_transition(&self, current: User) -> Result<(User, String), DomainError> {
        let now = Utc::now();

        // Context gathering is best-effort: a failed lookup degrades to the
        // sentinel / an error note, never aborts the transition.
        let ip = match self.ip.lookup().await {
            Ok(ip) => ip,
            Err(e) => {
                warn!(error = %e, "IP lookup failed; recording sentinel");
                IP_UNAVAILABLE.to_string()
            }
        };
        let (location, location_error) = match self.geo.locate().await {
            Ok(coords) => (Some(coords), None),
            Err(e) => {
                warn!(error = %e, "Geolocation failed; recording reason");
                (None, Some(e.to_string()))
            }
        };

        let new_status = current.status.toggled();
        let kind = EventKind::from(new_status);

        self.audit
            .append_log(NewLogEntry {
                user_id: current.id,
                user_display_name: current.display_name.clone(),
                timestamp: now,
                kind,
                ip,
                location,
                location_error,
            })
            .await?;

        // last_check_in refreshes only on entering CheckedIn.
        let last_check_in = match new_status {
            AttendanceStatus::CheckedIn => Some(Some(now)),
            AttendanceStatus::CheckedOut => None,
        };
        let updated = self
            .directory
            .update_user(
                current.id,
                UserPatch {
                    status: Some(new_status),
                    last_check_in,
                    ..UserPatch::default()
                },
            )
            .await?;

        self.sessions.publish(&updated)?;

        let message = match kind {
            EventKind::In => format!("Checked in at {}.", now.format("%H:%M")),
            EventKind::Out => format!("Checked out at {}.", now.format("%H:%M")),
        };
        Ok((updated, message))
    }
}
