//! User directory CRUD over the snapshot store.

use snapstore::Store;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::error::DomainError;
use crate::infra::storage::entity::{self, UserRecord};

/// Directory service with business rules for user management.
///
/// Every operation is a whole-collection read-modify-write against the
/// store; there is no per-record update.
#[derive(Clone)]
pub struct DirectoryService {
    store: Store,
}

impl DirectoryService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    #[instrument(name = "attendance.directory.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        debug!("Listing users");
        let records = entity::load_users(&self.store).await?;
        Ok(records.into_iter().map(User::from).collect())
    }

    #[instrument(
        name = "attendance.directory.add_user",
        skip(self, candidate),
        fields(username = %candidate.username)
    )]
    pub async fn add_user(&self, candidate: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        let mut records = entity::load_users(&self.store).await?;

        // Case-sensitive exact match
        if records.iter().any(|r| r.username == candidate.username) {
            return Err(DomainError::duplicate_username(candidate.username));
        }

        let record = UserRecord::create(candidate);
        let user = User::from(record.clone());
        records.push(record);
        entity::save_users(&self.store, &records).await?;

        info!(user_id = %user.id, "Successfully created user");
        Ok(user)
    }

    #[instrument(
        name = "attendance.directory.update_user",
        skip(self, patch),
        fields(user_id = %id)
    )]
    pub async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");

        let mut records = entity::load_users(&self.store).await?;

        if let Some(new_username) = &patch.username {
            if records
                .iter()
                .any(|r| r.id != id && &r.username == new_username)
            {
                return Err(DomainError::duplicate_username(new_username.clone()));
            }
        }

        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::user_not_found(id))?;

        apply_patch(record, patch);
        let user = User::from(record.clone());

        entity::save_users(&self.store, &records).await?;

        info!("Successfully updated user");
        Ok(user)
    }

    #[instrument(name = "attendance.directory.delete_user", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting user");

        let mut records = entity::load_users(&self.store).await?;
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            // Unknown id is a no-op, not an error. Log entries referencing a
            // deleted user are retained either way.
            debug!("No user with this id; nothing to delete");
        }

        entity::save_users(&self.store, &records).await?;
        Ok(())
    }
}

/// Merge patch fields onto the stored record, field by field. An empty or
/// absent patch password retains the stored one.
fn apply_patch(record: &mut UserRecord, patch: UserPatch) {
    if let Some(display_name) = patch.display_name {
        record.display_name = display_name;
    }
    if let Some(username) = patch.username {
        record.username = username;
    }
    match patch.password {
        Some(password) if !password.is_empty() => record.password = password,
        _ => {}
    }
    if let Some(role) = patch.role {
        record.role = role;
    }
    if let Some(status) = patch.status {
        record.status = status;
    }
    if let Some(last_check_in) = patch.last_check_in {
        record.last_check_in = last_check_in;
    }
}
