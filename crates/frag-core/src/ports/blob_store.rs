use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

use crate::fragment::BlobKey;

/// Raw byte storage addressed by `(owner_key, id)`.
///
/// Reads are fully materialized into one contiguous buffer before being
/// handed back; no streaming surface.
#[async_trait]
pub trait BlobStorePort: Send + Sync {
    async fn put(&self, key: &BlobKey, data: &[u8]) -> Result<()>;

    async fn get(&self, key: &BlobKey) -> Result<Option<Bytes>>;

    /// Returns false when no blob existed under the key.
    async fn delete(&self, key: &BlobKey) -> Result<bool>;
}

#[async_trait]
impl<T: BlobStorePort + ?Sized> BlobStorePort for Arc<T> {
    async fn put(&self, key: &BlobKey, data: &[u8]) -> Result<()> {
        (**self).put(key, data).await
    }

    async fn get(&self, key: &BlobKey) -> Result<Option<Bytes>> {
        (**self).get(key).await
    }

    async fn delete(&self, key: &BlobKey) -> Result<bool> {
        (**self).delete(key).await
    }
}
