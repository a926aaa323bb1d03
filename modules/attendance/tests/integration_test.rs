use std::sync::Arc;
use std::time::Duration;

use snapstore::{MemoryBackend, Store};

use attendance::contract::client::AttendanceApi;
use attendance::contract::error::AttendanceError;
use attendance::contract::model::{
    AttendanceStatus, EventKind, GeolocationData, NewUser, Role, UserPatch,
};
use attendance::domain::{
    attendance::AttendanceService, audit::AuditLogService, auth::AuthService,
    directory::DirectoryService, ports::{Geolocator, IpLookup}, session::SessionStore,
};
use attendance::gateways::local::LocalAttendanceClient;
use attendance::infra::collaborators::{
    DeniedGeolocator, FixedGeolocator, FixedIpLookup, UnavailableIpLookup,
};
use attendance::infra::seed;

/// Create a fresh zero-latency in-memory store, seeded.
async fn create_test_store() -> Store {
    let store = Store::new(Arc::new(MemoryBackend::new()), Duration::ZERO);
    seed::bootstrap(&store).await.expect("Failed to seed store");
    store
}

fn create_client_with(
    store: Store,
    sessions: Arc<SessionStore>,
    ip: Arc<dyn IpLookup>,
    geo: Arc<dyn Geolocator>,
) -> LocalAttendanceClient {
    let directory = Arc::new(DirectoryService::new(store.clone()));
    let audit = Arc::new(AuditLogService::new(store.clone()));
    let auth = Arc::new(AuthService::new(store, sessions.clone()));
    let machine = Arc::new(AttendanceService::new(
        directory.clone(),
        audit.clone(),
        sessions.clone(),
        ip,
        geo,
    ));
    LocalAttendanceClient::new(directory, auth, audit, machine, sessions)
}

/// Create a test client over a seeded store with well-behaved collaborators.
async fn create_test_client() -> LocalAttendanceClient {
    let store = create_test_store().await;
    create_client_with(
        store,
        Arc::new(SessionStore::in_memory()),
        Arc::new(FixedIpLookup("10.1.2.3".to_string())),
        Arc::new(FixedGeolocator(GeolocationData {
            latitude: 52.52,
            longitude: 13.405,
        })),
    )
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        display_name: format!("Test {username}"),
        username: username.to_string(),
        password: format!("{username}123"),
        role: Role::Employee,
    }
}

#[tokio::test]
async fn seeded_directory_lists_in_store_order() {
    let client = create_test_client().await;

    let users = client.list_users().await.unwrap();
    assert_eq!(users.len(), 4);
    assert_eq!(users[0].username, "admin");
    assert_eq!(users[0].role, Role::Admin);
    assert_eq!(users[1].username, "alice");
    assert!(users
        .iter()
        .all(|u| u.status == AttendanceStatus::CheckedOut && u.last_check_in.is_none()));
}

#[tokio::test]
async fn duplicate_username_is_rejected_and_collection_unchanged() {
    let client = create_test_client().await;
    let before = client.list_users().await.unwrap();

    let result = client.add_user(new_user("alice")).await;
    match result {
        Err(AttendanceError::DuplicateUsername { username }) => assert_eq!(username, "alice"),
        other => panic!("Expected DuplicateUsername, got {other:?}"),
    }

    let after = client.list_users().await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn username_match_is_case_sensitive() {
    let client = create_test_client().await;

    // "Alice" != "alice": allowed.
    let created = client.add_user(new_user("Alice")).await.unwrap();
    assert_eq!(created.username, "Alice");
    assert_eq!(client.list_users().await.unwrap().len(), 5);
}

#[tokio::test]
async fn update_merges_fields_and_retains_password_on_blank() {
    let client = create_test_client().await;
    let alice = client.login("alice", "alice123").await.unwrap();

    // Patch with empty password: display name changes, password survives.
    let updated = client
        .update_user(
            alice.id,
            UserPatch {
                display_name: Some("Alice N.".to_string()),
                password: Some(String::new()),
                ..UserPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.display_name, "Alice N.");
    assert!(client.login("alice", "alice123").await.is_ok());

    // Non-empty password replaces the stored one.
    client
        .update_user(
            alice.id,
            UserPatch {
                password: Some("fresh456".to_string()),
                ..UserPatch::default()
            },
        )
        .await
        .unwrap();
    assert!(matches!(
        client.login("alice", "alice123").await,
        Err(AttendanceError::InvalidCredentials)
    ));
    assert!(client.login("alice", "fresh456").await.is_ok());
}

#[tokio::test]
async fn update_unknown_user_fails_delete_unknown_is_noop() {
    let client = create_test_client().await;
    let ghost = uuid::Uuid::new_v4();

    let result = client.update_user(ghost, UserPatch::default()).await;
    assert!(matches!(result, Err(AttendanceError::UserNotFound { id }) if id == ghost));

    // Deleting an unknown id is not an error.
    client.delete_user(ghost).await.unwrap();
    assert_eq!(client.list_users().await.unwrap().len(), 4);
}

#[tokio::test]
async fn login_with_wrong_password_fails_without_mutation() {
    let client = create_test_client().await;

    let result = client.login("alice", "wrong").await;
    assert!(matches!(result, Err(AttendanceError::InvalidCredentials)));
    assert!(client.current_session().is_none());

    let unknown = client.login("nobody", "alice123").await;
    assert!(matches!(unknown, Err(AttendanceError::InvalidCredentials)));

    // No state was touched.
    assert!(client.list_logs().await.unwrap().is_empty());
    let users = client.list_users().await.unwrap();
    assert!(users.iter().all(|u| u.status == AttendanceStatus::CheckedOut));
}

#[tokio::test]
async fn login_publishes_sanitized_session() {
    let client = create_test_client().await;

    let alice = client.login("alice", "alice123").await.unwrap();
    assert_eq!(alice.username, "alice");
    assert_eq!(alice.status, AttendanceStatus::CheckedOut);

    let session = client.current_session().expect("session should be set");
    assert_eq!(session, alice);
}

#[tokio::test]
async fn toggle_records_entry_and_checks_in() {
    let client = create_test_client().await;
    let alice = client.login("alice", "alice123").await.unwrap();

    let outcome = client.toggle().await;
    assert!(outcome.success, "toggle should succeed: {}", outcome.message);

    let updated = outcome.user.expect("success outcome carries the user");
    assert_eq!(updated.status, AttendanceStatus::CheckedIn);
    let checked_in_at = updated.last_check_in.expect("last_check_in must be set");

    // One new `in` entry with the gathered context.
    let logs = client.list_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].kind, EventKind::In);
    assert_eq!(logs[0].user_id, alice.id);
    assert_eq!(logs[0].user_display_name, alice.display_name);
    assert_eq!(logs[0].ip, "10.1.2.3");
    assert_eq!(
        logs[0].location,
        Some(GeolocationData {
            latitude: 52.52,
            longitude: 13.405
        })
    );
    assert!(logs[0].location_error.is_none());
    assert_eq!(logs[0].timestamp, checked_in_at);

    // The session identity was republished.
    assert_eq!(client.current_session().unwrap(), updated);
}

#[tokio::test]
async fn double_toggle_restores_status_and_keeps_check_in_time() {
    let client = create_test_client().await;
    client.login("alice", "alice123").await.unwrap();

    let first = client.toggle().await;
    assert!(first.success);
    let checked_in_at = first.user.unwrap().last_check_in.unwrap();

    let second = client.toggle().await;
    assert!(second.success);
    let after = second.user.unwrap();

    // Complement law: back to checked out; last_check_in still the moment of
    // the entry into CheckedIn, untouched by checking out.
    assert_eq!(after.status, AttendanceStatus::CheckedOut);
    assert_eq!(after.last_check_in, Some(checked_in_at));

    // Newest first: the `out` entry precedes the `in` entry.
    let logs = client.list_logs().await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].kind, EventKind::Out);
    assert_eq!(logs[1].kind, EventKind::In);
}

#[tokio::test]
async fn audit_log_is_newest_first_with_unique_ids() {
    let client = create_test_client().await;
    client.login("alice", "alice123").await.unwrap();

    for _ in 0..5 {
        assert!(client.toggle().await.success);
    }

    let logs = client.list_logs().await.unwrap();
    assert_eq!(logs.len(), 5);

    // Strict reverse-insertion order.
    for pair in logs.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
    let mut ids: Vec<_> = logs.iter().map(|l| l.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5, "log ids must be unique");
}

#[tokio::test]
async fn toggle_without_session_is_rejected_without_side_effects() {
    let client = create_test_client().await;

    let outcome = client.toggle().await;
    assert!(!outcome.success);
    assert!(outcome.user.is_none());
    assert!(client.list_logs().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_collaborators_degrade_to_sentinel_and_reason() {
    let store = create_test_store().await;
    let client = create_client_with(
        store,
        Arc::new(SessionStore::in_memory()),
        Arc::new(UnavailableIpLookup),
        Arc::new(DeniedGeolocator),
    );
    client.login("alice", "alice123").await.unwrap();

    let outcome = client.toggle().await;
    assert!(outcome.success, "collaborator failures must not block");

    let logs = client.list_logs().await.unwrap();
    assert_eq!(logs[0].ip, "Unavailable");
    assert!(logs[0].location.is_none());
    assert_eq!(logs[0].location_error.as_deref(), Some("Permission denied"));
}

#[tokio::test]
async fn toggle_failure_after_append_leaves_log_entry() {
    let client = create_test_client().await;
    let alice = client.login("alice", "alice123").await.unwrap();

    // Pull the user out from under the session: the update step will fail.
    client.delete_user(alice.id).await.unwrap();

    let outcome = client.toggle().await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Could not record attendance. Please try again.");

    // The append was durable even though the user update failed: the
    // accepted inconsistency window, not rolled back.
    let logs = client.list_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user_id, alice.id);
}

#[tokio::test(start_paused = true)]
async fn concurrent_toggle_is_rejected_by_the_in_flight_guard() {
    // Nonzero latency so the first toggle is still suspended in the store
    // when the second one hits the guard.
    let store = Store::new(Arc::new(MemoryBackend::new()), Duration::from_millis(50));
    seed::bootstrap(&store).await.unwrap();

    let client = create_client_with(
        store,
        Arc::new(SessionStore::in_memory()),
        Arc::new(FixedIpLookup("10.1.2.3".to_string())),
        Arc::new(DeniedGeolocator),
    );
    client.login("alice", "alice123").await.unwrap();

    let (first, second) = tokio::join!(client.toggle(), client.toggle());

    assert!(first.success);
    assert!(!second.success);
    assert_eq!(second.message, "An attendance update is already in progress.");

    // Only the accepted toggle left a log entry.
    assert_eq!(client.list_logs().await.unwrap().len(), 1);
}

#[tokio::test]
async fn restore_session_keeps_live_identity() {
    let client = create_test_client().await;
    let alice = client.login("alice", "alice123").await.unwrap();

    let restored = client.restore_session().await.unwrap();
    assert_eq!(restored, Some(alice));
}

#[tokio::test]
async fn restore_session_discards_deleted_identity() {
    let client = create_test_client().await;
    let alice = client.login("alice", "alice123").await.unwrap();

    client.delete_user(alice.id).await.unwrap();

    let restored = client.restore_session().await.unwrap();
    assert!(restored.is_none());
    assert!(client.current_session().is_none(), "slot must be cleared");
}

#[tokio::test]
async fn session_file_survives_restart_and_carries_no_password() {
    let tmp = tempfile::tempdir().unwrap();
    let session_path = tmp.path().join("session.json");
    let store = create_test_store().await;

    // First application run: login writes the session file.
    {
        let client = create_client_with(
            store.clone(),
            Arc::new(SessionStore::at_path(session_path.clone())),
            Arc::new(FixedIpLookup("10.1.2.3".to_string())),
            Arc::new(DeniedGeolocator),
        );
        client.login("alice", "alice123").await.unwrap();
    }

    let text = std::fs::read_to_string(&session_path).unwrap();
    assert!(text.contains("alice"));
    assert!(!text.contains("alice123"), "session text must not leak the password");

    // Second run over the same store: the identity revalidates.
    let client = create_client_with(
        store,
        Arc::new(SessionStore::at_path(session_path.clone())),
        Arc::new(FixedIpLookup("10.1.2.3".to_string())),
        Arc::new(DeniedGeolocator),
    );
    let restored = client.restore_session().await.unwrap();
    assert_eq!(restored.unwrap().username, "alice");

    // Logout removes the file.
    client.logout();
    assert!(!session_path.exists());
}

#[tokio::test]
async fn deleting_a_user_retains_their_log_entries() {
    let client = create_test_client().await;
    let alice = client.login("alice", "alice123").await.unwrap();
    assert!(client.toggle().await.success);

    client.delete_user(alice.id).await.unwrap();

    // No cascading delete: the entry still references the removed user.
    let logs = client.list_logs().await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user_id, alice.id);
    assert_eq!(client.list_users().await.unwrap().len(), 3);
}
