//! First-use bootstrap of the snapshot store.

use snapstore::Store;
use tracing::info;

use crate::contract::model::{AttendanceStatus, Role};
use crate::infra::storage::entity::{self, UserRecord};
use uuid::Uuid;

/// Seed the store on first use: one admin and three employees, all checked
/// out, plus an empty logs collection.
///
/// Idempotent: seeding only happens when the users collection key is
/// entirely absent. An existing, even empty, users collection is left
/// untouched.
pub async fn bootstrap(store: &Store) -> snapstore::Result<bool> {
    if store.contains(entity::USERS).await? {
        return Ok(false);
    }

    let users = seed_users();
    entity::save_users(store, &users).await?;
    entity::save_logs(store, &[]).await?;
    info!(count = users.len(), "seeded user directory");
    Ok(true)
}

fn seed_users() -> Vec<UserRecord> {
    [
        ("System Admin", "admin", "admin123", Role::Admin),
        ("Alice Nguyen", "alice", "alice123", Role::Employee),
        ("Bob Tran", "bob", "bob123", Role::Employee),
        ("Carol Diaz", "carol", "carol123", Role::Employee),
    ]
    .into_iter()
    .map(|(display_name, username, password, role)| UserRecord {
        id: Uuid::new_v4(),
        display_name: display_name.to_string(),
        username: username.to_string(),
        password: password.to_string(),
        role,
        status: AttendanceStatus::CheckedOut,
        last_check_in: None,
    })
    .collect()
}
