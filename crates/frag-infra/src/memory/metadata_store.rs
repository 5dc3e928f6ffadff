use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use frag_core::ports::MetadataStorePort;
use frag_core::{FragmentId, FragmentRecord, OwnerKey};

/// Metadata store backed by an in-process table.
///
/// Records live in a `Vec` so listing naturally follows insertion order;
/// upserts replace in place and keep a record's position.
#[derive(Default)]
pub struct MemoryMetadataStore {
    records: RwLock<Vec<FragmentRecord>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStorePort for MemoryMetadataStore {
    async fn put(&self, record: &FragmentRecord) -> Result<()> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    async fn get_by_id(&self, id: &FragmentId) -> Result<Option<FragmentRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == *id).cloned())
    }

    async fn list_by_owner(&self, owner_key: &OwnerKey) -> Result<Vec<FragmentRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.is_owned_by(owner_key))
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: &FragmentId) -> Result<Option<FragmentRecord>> {
        let mut records = self.records.write().await;
        let position = records.iter().position(|r| r.id == *id);
        Ok(position.map(|i| records.remove(i)))
    }
}
