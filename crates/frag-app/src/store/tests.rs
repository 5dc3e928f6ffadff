//! Failure-injection tests for the orchestration layer, driven through
//! mocked ports. Happy-path behavior is covered by the integration tests
//! against real adapters.

use std::sync::{Arc, Mutex as StdMutex};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use mockall::mock;

use super::*;
use frag_core::ports::ClockPort;

mock! {
    pub Meta {}

    #[async_trait::async_trait]
    impl MetadataStorePort for Meta {
        async fn put(&self, record: &FragmentRecord) -> anyhow::Result<()>;
        async fn get_by_id(&self, id: &FragmentId) -> anyhow::Result<Option<FragmentRecord>>;
        async fn list_by_owner(&self, owner_key: &OwnerKey) -> anyhow::Result<Vec<FragmentRecord>>;
        async fn delete_by_id(&self, id: &FragmentId) -> anyhow::Result<Option<FragmentRecord>>;
    }
}

mock! {
    pub Blobs {}

    #[async_trait::async_trait]
    impl BlobStorePort for Blobs {
        async fn put(&self, key: &BlobKey, data: &[u8]) -> anyhow::Result<()>;
        async fn get(&self, key: &BlobKey) -> anyhow::Result<Option<Bytes>>;
        async fn delete(&self, key: &BlobKey) -> anyhow::Result<bool>;
    }
}

struct FixedClock(DateTime<Utc>);

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

const OWNER: &str = "owner@example.com";

fn store_with(meta: MockMeta, blobs: MockBlobs) -> FragmentStore {
    FragmentStore::new(
        Arc::new(meta),
        Arc::new(blobs),
        Arc::new(FixedClock(Utc::now())),
    )
}

fn existing_record(id: &str, content_type: &str) -> FragmentRecord {
    FragmentRecord::new(
        FragmentId::from(id),
        OwnerKey::derive(OWNER),
        content_type,
        3,
        Utc::now(),
    )
}

#[tokio::test]
async fn create_rejects_empty_body_before_any_store_io() {
    // No expectations set: any port call would panic the mock.
    let store = store_with(MockMeta::new(), MockBlobs::new());

    let err = store
        .create(b"", "text/plain", OWNER, None)
        .await
        .unwrap_err();
    assert!(matches!(err, FragmentError::Validation(_)));
}

#[tokio::test]
async fn create_rejects_unsupported_type_with_valid_alternatives() {
    let store = store_with(MockMeta::new(), MockBlobs::new());

    let err = store
        .create(b"data", "video/mp4", OWNER, None)
        .await
        .unwrap_err();
    match err {
        FragmentError::UnsupportedType { content_type, valid } => {
            assert_eq!(content_type, "video/mp4");
            assert!(valid.contains(&"text/plain"));
            assert!(valid.contains(&"image/png"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn create_with_pinned_id_of_existing_fragment_is_rejected() {
    let record = existing_record("frag-1", "text/plain");
    let id = record.id.clone();

    let mut meta = MockMeta::new();
    meta.expect_get_by_id()
        .returning(move |_| Ok(Some(record.clone())));

    // No blob expectations: rejection must happen before any blob write.
    let store = store_with(meta, MockBlobs::new());
    let err = store
        .create(b"data", "text/markdown", "other@example.com", Some(id))
        .await
        .unwrap_err();

    match err {
        FragmentError::IdInUse { id } => assert_eq!(id, "frag-1"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn mutation_lock_entries_are_released_after_each_operation() {
    let mut meta = MockMeta::new();
    meta.expect_get_by_id().returning(|_| Ok(None));
    meta.expect_put().returning(|_| Ok(()));
    let mut blobs = MockBlobs::new();
    blobs.expect_put().returning(|_, _| Ok(()));

    let store = store_with(meta, blobs);
    for _ in 0..100 {
        store.create(b"data", "text/plain", OWNER, None).await.unwrap();
    }

    assert!(store.mutation_locks.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_compensates_with_blob_delete_when_metadata_write_fails() {
    let mut meta = MockMeta::new();
    meta.expect_get_by_id().returning(|_| Ok(None));
    meta.expect_put()
        .times(1)
        .returning(|_| Err(anyhow!("metadata backend unavailable")));

    let mut blobs = MockBlobs::new();
    blobs.expect_put().times(1).returning(|_, _| Ok(()));
    blobs.expect_delete().times(1).returning(|_| Ok(true));

    let store = store_with(meta, blobs);
    let err = store
        .create(b"data", "text/plain", OWNER, None)
        .await
        .unwrap_err();

    match err {
        FragmentError::StoreIo { store, .. } => assert_eq!(store, "metadata"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn update_restores_previous_blob_when_metadata_write_fails() {
    let record = existing_record("frag-1", "text/plain");
    let id = record.id.clone();

    let mut meta = MockMeta::new();
    let lookup = record.clone();
    meta.expect_get_by_id()
        .returning(move |_| Ok(Some(lookup.clone())));
    meta.expect_put()
        .times(1)
        .returning(|_| Err(anyhow!("metadata backend unavailable")));

    let puts: Arc<StdMutex<Vec<Vec<u8>>>> = Arc::new(StdMutex::new(Vec::new()));
    let seen = puts.clone();

    let mut blobs = MockBlobs::new();
    blobs
        .expect_get()
        .returning(|_| Ok(Some(Bytes::from_static(b"old"))));
    blobs.expect_put().times(2).returning(move |_, data| {
        seen.lock().unwrap().push(data.to_vec());
        Ok(())
    });

    let store = store_with(meta, blobs);
    let err = store.update(&id, OWNER, b"new bytes").await.unwrap_err();

    assert!(matches!(err, FragmentError::StoreIo { store: "metadata", .. }));
    let writes = puts.lock().unwrap();
    assert_eq!(writes.as_slice(), &[b"new bytes".to_vec(), b"old".to_vec()]);
}

#[tokio::test]
async fn get_with_data_surfaces_missing_blob_as_consistency_violation() {
    let record = existing_record("frag-1", "text/plain");
    let id = record.id.clone();

    let mut meta = MockMeta::new();
    meta.expect_get_by_id()
        .returning(move |_| Ok(Some(record.clone())));

    let mut blobs = MockBlobs::new();
    blobs.expect_get().returning(|_| Ok(None));

    let store = store_with(meta, blobs);
    let err = store.get(&id, OWNER, true).await.unwrap_err();
    assert!(matches!(err, FragmentError::Consistency { .. }));
}

#[tokio::test]
async fn delete_still_reports_removed_record_when_blob_delete_fails() {
    let record = existing_record("frag-1", "text/plain");
    let id = record.id.clone();

    let mut meta = MockMeta::new();
    let lookup = record.clone();
    meta.expect_get_by_id()
        .returning(move |_| Ok(Some(lookup.clone())));
    let removed = record.clone();
    meta.expect_delete_by_id()
        .times(1)
        .returning(move |_| Ok(Some(removed.clone())));

    let mut blobs = MockBlobs::new();
    blobs
        .expect_delete()
        .times(1)
        .returning(|_| Err(anyhow!("blob backend unavailable")));

    let store = store_with(meta, blobs);
    let deleted = store.delete(&id, OWNER).await.unwrap();
    assert_eq!(deleted.unwrap().id, record.id);
}

#[tokio::test]
async fn store_errors_are_never_downgraded_to_not_found() {
    let mut meta = MockMeta::new();
    meta.expect_get_by_id()
        .returning(|_| Err(anyhow!("metadata backend unavailable")));

    let store = store_with(meta, MockBlobs::new());
    let err = store
        .get(&FragmentId::from("frag-1"), OWNER, false)
        .await
        .unwrap_err();
    assert!(matches!(err, FragmentError::StoreIo { store: "metadata", .. }));
}
