//! Integration tests for the `Dragonfly` voter backend.
//!
//! These tests require a live Dragonfly (or Redis) instance. Run with:
//!
//! ```bash
//! docker run -d -p 6379:6379 docker.dragonflydb.io/dragonflydb/dragonfly
//! cargo test -p voter-store -- --ignored
//! ```
//!
//! Tests that need the instance are marked `#[ignore]` so they are skipped
//! during normal `cargo test` runs. They share one keyspace, so each one
//! holds [`KEYSPACE`] for its whole body.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::indexing_slicing
)]

use std::time::Duration;

use chrono::{TimeZone, Utc};
use fred::prelude::*;
use tokio::sync::{Mutex, MutexGuard};
use voter_store::dragonfly::voter_key;
use voter_store::{
    BackendKind, DragonflyBackend, StoreConfig, StoreError, VoterBackend, VoterStore,
};
use voter_types::{PollId, VoterId, VoterRecord};

/// Dragonfly connection URL for the local Docker instance.
const DRAGONFLY_URL: &str = "redis://localhost:6379";

/// Serializes tests that touch the shared `voter:*` namespace.
static KEYSPACE: Mutex<()> = Mutex::const_new(());

// =============================================================================
// Helper: connect and start from an empty namespace
// =============================================================================

async fn setup() -> (MutexGuard<'static, ()>, DragonflyBackend, VoterStore) {
    let guard = KEYSPACE.lock().await;
    let backend = DragonflyBackend::connect(DRAGONFLY_URL, Duration::from_secs(5))
        .await
        .expect("Failed to connect to Dragonfly -- is it running?");
    let store = VoterStore::new(VoterBackend::from(backend.clone()));
    store.delete_all().await.expect("Failed to clear voters");
    (guard, backend, store)
}

fn sample_voter(id: u64) -> VoterRecord {
    VoterRecord::new(VoterId::new(id), "A", "B").with_poll(
        PollId::new(500),
        Utc.with_ymd_and_hms(2023, 11, 7, 12, 0, 0).unwrap(),
    )
}

// =============================================================================
// Connection
// =============================================================================

#[tokio::test]
async fn connect_to_unreachable_instance_fails_fast() {
    let result = DragonflyBackend::connect("redis://127.0.0.1:1", Duration::from_millis(500)).await;
    let err = result.err().expect("connect should fail");
    assert!(err.is_transport(), "unexpected error: {err}");
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker run ... dragonfly)"]
async fn connect_from_config_with_bare_location() {
    let mut config = StoreConfig {
        backend: BackendKind::Dragonfly,
        ..StoreConfig::default()
    };
    config
        .apply_overrides(|name| (name == "REDIS_URL").then(|| "localhost:6379".to_owned()))
        .expect("valid overrides");

    let store = VoterStore::connect(&config).await.expect("Failed to connect");
    assert_eq!(store.backend_name(), "dragonfly");
    store.ping().await.expect("Failed to ping");
}

// =============================================================================
// Record lifecycle
// =============================================================================

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker run ... dragonfly)"]
async fn add_get_update_delete_roundtrip() {
    let (_guard, _backend, store) = setup().await;
    let voter = sample_voter(1);

    store.add_voter(voter.clone()).await.expect("Failed to add");
    assert_eq!(store.get_voter(VoterId::new(1)).await.unwrap(), voter);

    let mut replacement = VoterRecord::new(VoterId::new(1), "C", "D");
    replacement.is_done = true;
    store
        .update_voter(replacement.clone())
        .await
        .expect("Failed to update");
    assert_eq!(store.get_voter(VoterId::new(1)).await.unwrap(), replacement);

    store
        .delete_voter(VoterId::new(1))
        .await
        .expect("Failed to delete");
    assert!(matches!(
        store.get_voter(VoterId::new(1)).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker run ... dragonfly)"]
async fn duplicate_add_keeps_first_record() {
    let (_guard, _backend, store) = setup().await;
    store.add_voter(sample_voter(2)).await.unwrap();

    let mut duplicate = sample_voter(2);
    duplicate.first_name = String::from("Other");
    let err = store.add_voter(duplicate).await.unwrap_err();

    assert!(matches!(err, StoreError::AlreadyExists(_)));
    assert_eq!(store.get_voter(VoterId::new(2)).await.unwrap().first_name, "A");
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker run ... dragonfly)"]
async fn missing_voter_operations_are_not_found() {
    let (_guard, _backend, store) = setup().await;
    let id = VoterId::new(3);

    assert!(store.get_voter(id).await.unwrap_err().is_not_found());
    assert!(store.update_voter(sample_voter(3)).await.unwrap_err().is_not_found());
    assert!(store.delete_voter(id).await.unwrap_err().is_not_found());
    assert!(store.change_done_status(id, true).await.unwrap_err().is_not_found());
    assert!(store.get_all_voter_polls(id).await.unwrap_err().is_not_found());

    // update must not have created the key
    assert!(store.get_all_voters().await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker run ... dragonfly)"]
async fn change_done_status_keeps_other_fields() {
    let (_guard, _backend, store) = setup().await;
    let voter = sample_voter(4);
    store.add_voter(voter.clone()).await.unwrap();

    store.change_done_status(VoterId::new(4), true).await.unwrap();

    let stored = store.get_voter(VoterId::new(4)).await.unwrap();
    assert!(stored.is_done);
    assert_eq!(stored.first_name, voter.first_name);
    assert_eq!(stored.history, voter.history);
    assert_eq!(store.get_voters_by_done_status(true).await.unwrap().len(), 1);
    assert!(store.get_voters_by_done_status(false).await.unwrap().is_empty());
}

// =============================================================================
// Poll history
// =============================================================================

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker run ... dragonfly)"]
async fn poll_queries_match_stored_history() {
    let (_guard, _backend, store) = setup().await;
    let voter = sample_voter(5);
    store.add_voter(voter.clone()).await.unwrap();

    let polls = store.get_all_voter_polls(VoterId::new(5)).await.unwrap();
    assert_eq!(polls, voter.history);

    let entry = store
        .get_voter_poll(VoterId::new(5), PollId::new(500))
        .await
        .unwrap();
    assert_eq!(entry, voter.history[0]);

    let err = store
        .get_voter_poll(VoterId::new(5), PollId::new(999))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::PollNotFound { .. }));
}

// =============================================================================
// Namespace-wide operations and document format
// =============================================================================

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker run ... dragonfly)"]
async fn delete_all_clears_only_the_voter_namespace() {
    let (_guard, backend, store) = setup().await;
    for id in 10..15 {
        store.add_voter(sample_voter(id)).await.unwrap();
    }
    let _: () = backend
        .client()
        .set("unrelated:key", "keep", None, None, false)
        .await
        .unwrap();

    assert_eq!(store.get_all_voters().await.unwrap().len(), 5);
    assert_eq!(store.delete_all().await.unwrap(), 5);
    assert!(store.get_all_voters().await.unwrap().is_empty());
    assert_eq!(store.delete_all().await.unwrap(), 0);

    let kept: Option<String> = backend.client().get("unrelated:key").await.unwrap();
    assert_eq!(kept.as_deref(), Some("keep"));
    let _: u64 = backend.client().del("unrelated:key").await.unwrap();
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker run ... dragonfly)"]
async fn documents_use_the_namespaced_camel_case_layout() {
    let (_guard, backend, store) = setup().await;
    store
        .add_voter(VoterRecord::new(VoterId::new(20), "E", "F"))
        .await
        .unwrap();

    let raw: Option<String> = backend.client().get(voter_key(VoterId::new(20))).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw.expect("document missing")).unwrap();
    assert_eq!(value["voterId"], 20);
    assert_eq!(value["firstName"], "E");
    assert_eq!(value["isDone"], false);
    assert!(value.get("voterHistory").is_none());
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker run ... dragonfly)"]
async fn null_history_documents_are_readable() {
    let (_guard, backend, store) = setup().await;
    let doc = r#"{"voterId":21,"firstName":"G","lastName":"H","isDone":false,"voterHistory":null}"#;
    let _: () = backend
        .client()
        .set(voter_key(VoterId::new(21)), doc, None, None, false)
        .await
        .unwrap();

    let voter = store.get_voter(VoterId::new(21)).await.unwrap();
    assert!(voter.history.is_empty());
    assert!(store.get_all_voter_polls(VoterId::new(21)).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires live Dragonfly instance (docker run ... dragonfly)"]
async fn malformed_documents_are_serialization_errors() {
    let (_guard, backend, store) = setup().await;
    let _: () = backend
        .client()
        .set(voter_key(VoterId::new(22)), "{not json", None, None, false)
        .await
        .unwrap();

    let err = store.get_voter(VoterId::new(22)).await.unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
}
