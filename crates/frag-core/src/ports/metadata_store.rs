use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::fragment::{FragmentRecord, OwnerKey};
use crate::ids::FragmentId;

/// Keyed table of fragment metadata records.
///
/// This is a dumb store: `get_by_id` does no owner filtering, the
/// orchestrator owns the access-control check. Any operation may fail
/// with a transient I/O error that must propagate, never be converted
/// to "not found".
#[async_trait]
pub trait MetadataStorePort: Send + Sync {
    /// Upsert by id; idempotent.
    async fn put(&self, record: &FragmentRecord) -> Result<()>;

    async fn get_by_id(&self, id: &FragmentId) -> Result<Option<FragmentRecord>>;

    /// All records for one owner, in insertion order of the underlying
    /// table.
    async fn list_by_owner(&self, owner_key: &OwnerKey) -> Result<Vec<FragmentRecord>>;

    /// Remove by id, returning the removed record if it existed.
    async fn delete_by_id(&self, id: &FragmentId) -> Result<Option<FragmentRecord>>;
}

#[async_trait]
impl<T: MetadataStorePort + ?Sized> MetadataStorePort for Arc<T> {
    async fn put(&self, record: &FragmentRecord) -> Result<()> {
        (**self).put(record).await
    }

    async fn get_by_id(&self, id: &FragmentId) -> Result<Option<FragmentRecord>> {
        (**self).get_by_id(id).await
    }

    async fn list_by_owner(&self, owner_key: &OwnerKey) -> Result<Vec<FragmentRecord>> {
        (**self).list_by_owner(owner_key).await
    }

    async fn delete_by_id(&self, id: &FragmentId) -> Result<Option<FragmentRecord>> {
        (**self).delete_by_id(id).await
    }
}
