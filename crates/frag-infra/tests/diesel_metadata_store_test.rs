//! Diesel metadata store tests against a throwaway SQLite file.

use chrono::{DateTime, Utc};
use frag_core::ports::MetadataStorePort;
use frag_core::{FragmentId, FragmentRecord, OwnerKey};
use frag_infra::db::{init_db_pool, DieselMetadataStore};

fn test_store(dir: &tempfile::TempDir) -> DieselMetadataStore {
    let db_path = dir.path().join("fragments.sqlite");
    let pool = init_db_pool(db_path.to_str().expect("utf-8 temp path"))
        .expect("Failed to create test DB pool");
    DieselMetadataStore::new(pool)
}

fn record(id: &str, owner: &str, size: u64) -> FragmentRecord {
    let now = DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).unwrap();
    FragmentRecord::new(
        FragmentId::from(id),
        OwnerKey::derive(owner),
        "text/plain",
        size,
        now,
    )
}

#[tokio::test]
async fn put_then_get_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    let rec = record("frag-1", "user1@example.com", 11);
    store.put(&rec).await.expect("Failed to insert record");

    let fetched = store
        .get_by_id(&rec.id)
        .await
        .expect("Failed to fetch record")
        .expect("Record should exist");
    assert_eq!(fetched, rec);
}

#[tokio::test]
async fn get_missing_id_is_none_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    let missing = store
        .get_by_id(&FragmentId::from("nope"))
        .await
        .expect("Lookup should not error");
    assert!(missing.is_none());
}

#[tokio::test]
async fn put_is_an_idempotent_upsert() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    let mut rec = record("frag-1", "user1@example.com", 11);
    store.put(&rec).await.unwrap();
    rec.touch(42, Utc::now());
    store.put(&rec).await.unwrap();

    let listed = store
        .list_by_owner(&OwnerKey::derive("user1@example.com"))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].size, 42);
}

#[tokio::test]
async fn listing_is_scoped_by_owner_and_ordered_by_creation() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    let first = record("frag-a", "user1@example.com", 1);
    let mut second = record("frag-b", "user1@example.com", 2);
    second.created = first.created + chrono::Duration::milliseconds(10);
    second.updated = second.created;
    let foreign = record("frag-c", "user2@example.com", 3);

    store.put(&second).await.unwrap();
    store.put(&first).await.unwrap();
    store.put(&foreign).await.unwrap();

    let listed = store
        .list_by_owner(&OwnerKey::derive("user1@example.com"))
        .await
        .unwrap();
    let ids: Vec<_> = listed.iter().map(|r| r.id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["frag-a", "frag-b"]);
}

#[tokio::test]
async fn same_millisecond_creations_list_in_deterministic_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    let first = record("frag-a", "user1@example.com", 1);
    let mut second = record("frag-b", "user1@example.com", 2);
    second.created = first.created;
    second.updated = first.created;

    // Insertion order reversed on purpose; the id tie-break decides.
    store.put(&second).await.unwrap();
    store.put(&first).await.unwrap();

    let listed = store
        .list_by_owner(&OwnerKey::derive("user1@example.com"))
        .await
        .unwrap();
    let ids: Vec<_> = listed.iter().map(|r| r.id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["frag-a", "frag-b"]);
}

#[tokio::test]
async fn delete_returns_removed_record_and_is_none_afterwards() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    let rec = record("frag-1", "user1@example.com", 11);
    store.put(&rec).await.unwrap();

    let removed = store.delete_by_id(&rec.id).await.unwrap();
    assert_eq!(removed.unwrap().id, rec.id);

    assert!(store.get_by_id(&rec.id).await.unwrap().is_none());
    assert!(store.delete_by_id(&rec.id).await.unwrap().is_none());
}
