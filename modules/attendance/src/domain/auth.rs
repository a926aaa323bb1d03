//! Authentication gate over the user directory.

use std::sync::Arc;

use snapstore::Store;
use tracing::{info, instrument, warn};

use crate::contract::model::User;
use crate::domain::error::DomainError;
use crate::domain::session::SessionStore;
use crate::infra::storage::entity;

/// Validates username/password pairs against the directory and publishes
/// the session identity on success.
#[derive(Clone)]
pub struct AuthService {
    store: Store,
    sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(store: Store, sessions: Arc<SessionStore>) -> Self {
        Self { store, sessions }
    }

    #[instrument(name = "attendance.auth.login", skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User, DomainError> {
        let records = entity::load_users(&self.store).await?;

        // First user whose username matches exactly. Plain equality on the
        // stored password: a placeholder, not a credential system.
        let record = records
            .into_iter()
            .find(|r| r.username == username)
            .ok_or(DomainError::InvalidCredentials)?;

        if record.password != password {
            warn!("Login rejected: password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        let user = User::from(record);
        self.sessions.publish(&user)?;

        info!(user_id = %user.id, "Login succeeded");
        Ok(user)
    }

    /// Clear the session identity.
    #[instrument(name = "attendance.auth.logout", skip(self))]
    pub fn logout(&self) {
        self.sessions.clear();
        info!("Session cleared");
    }
}
