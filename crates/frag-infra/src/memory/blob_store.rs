use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use frag_core::ports::BlobStorePort;
use frag_core::BlobKey;

/// Blob store backed by an in-process map keyed by the canonical
/// `<owner_hex>/<id>` form.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStorePort for MemoryBlobStore {
    async fn put(&self, key: &BlobKey, data: &[u8]) -> Result<()> {
        let mut blobs = self.blobs.write().await;
        blobs.insert(key.storage_key(), Bytes::copy_from_slice(data));
        Ok(())
    }

    async fn get(&self, key: &BlobKey) -> Result<Option<Bytes>> {
        let blobs = self.blobs.read().await;
        Ok(blobs.get(&key.storage_key()).cloned())
    }

    async fn delete(&self, key: &BlobKey) -> Result<bool> {
        let mut blobs = self.blobs.write().await;
        Ok(blobs.remove(&key.storage_key()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frag_core::{FragmentId, OwnerKey};

    fn key(id: &str) -> BlobKey {
        BlobKey::new(OwnerKey::derive("user1@example.com"), FragmentId::from(id))
    }

    #[tokio::test]
    async fn put_get_delete_round_trip() {
        let store = MemoryBlobStore::new();
        let key = key("frag-1");

        store.put(&key, b"payload").await.unwrap();
        assert_eq!(store.get(&key).await.unwrap().unwrap(), &b"payload"[..]);

        assert!(store.delete(&key).await.unwrap());
        assert!(store.get(&key).await.unwrap().is_none());
        assert!(!store.delete(&key).await.unwrap());
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let store = MemoryBlobStore::new();
        assert!(store.get(&key("absent")).await.unwrap().is_none());
    }
}
