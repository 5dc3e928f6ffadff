use anyhow::{Context, Result};
use async_trait::async_trait;

use frag_core::ports::MetadataStorePort;
use frag_core::{FragmentId, FragmentRecord, OwnerKey};

use super::dao::fragment as dao;
use super::models::FragmentRow;
use super::pool::DbPool;

/// Metadata store backed by SQLite through Diesel.
///
/// Row conversion failures (malformed stored columns) propagate like any
/// other store error; they are never reported as "not found".
pub struct DieselMetadataStore {
    pool: DbPool,
}

impl DieselMetadataStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MetadataStorePort for DieselMetadataStore {
    async fn put(&self, record: &FragmentRecord) -> Result<()> {
        let mut conn = self.pool.get().context("acquire sqlite connection")?;
        dao::upsert_fragment(&mut conn, &FragmentRow::from_record(record))
    }

    async fn get_by_id(&self, id: &FragmentId) -> Result<Option<FragmentRecord>> {
        let mut conn = self.pool.get().context("acquire sqlite connection")?;
        dao::get_fragment_by_id(&mut conn, id.as_str())?
            .map(FragmentRow::into_record)
            .transpose()
    }

    async fn list_by_owner(&self, owner_key: &OwnerKey) -> Result<Vec<FragmentRecord>> {
        let mut conn = self.pool.get().context("acquire sqlite connection")?;
        dao::list_fragments_by_owner(&mut conn, &owner_key.to_hex())?
            .into_iter()
            .map(FragmentRow::into_record)
            .collect()
    }

    async fn delete_by_id(&self, id: &FragmentId) -> Result<Option<FragmentRecord>> {
        let mut conn = self.pool.get().context("acquire sqlite connection")?;
        dao::delete_fragment_by_id(&mut conn, id.as_str())?
            .map(FragmentRow::into_record)
            .transpose()
    }
}
