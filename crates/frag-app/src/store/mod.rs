//! Fragment store orchestration.
//!
//! Composes the metadata store and blob store ports into the operations
//! exposed to the surrounding HTTP layer. The two backends share no
//! transaction, so every mutation follows the same discipline: blob
//! first, metadata second, with a single best-effort compensating action
//! when the second write fails. A crash between the failed metadata write
//! and the compensation can still orphan a blob; those are reclaimed by
//! an out-of-band sweep, not here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tracing::{debug, error, warn};

use frag_core::convert::{self, ConvertError};
use frag_core::ports::{BlobStorePort, ClockPort, MetadataStorePort};
use frag_core::{BlobKey, FragmentError, FragmentId, FragmentRecord, OwnerKey};

/// A fragment as returned to callers: metadata plus, on request, the
/// blob content.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub metadata: FragmentRecord,
    pub data: Option<Bytes>,
}

/// Result of a read-with-conversion: the stored metadata, the content
/// type of the converted representation, and the converted bytes.
#[derive(Debug, Clone)]
pub struct ConvertedFragment {
    pub metadata: FragmentRecord,
    pub content_type: String,
    pub data: Bytes,
}

/// Listing of an owner's fragments, bare ids or expanded records.
#[derive(Debug, Clone)]
pub enum FragmentListing {
    Ids(Vec<FragmentId>),
    Records(Vec<FragmentRecord>),
}

pub struct FragmentStore {
    metadata: Arc<dyn MetadataStorePort>,
    blobs: Arc<dyn BlobStorePort>,
    clock: Arc<dyn ClockPort>,
    /// Serializes mutations per `(owner_key, id)` so concurrent update
    /// and delete on one fragment never interleave their two-store
    /// writes. Reads take no lock.
    mutation_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl FragmentStore {
    pub fn new(
        metadata: Arc<dyn MetadataStorePort>,
        blobs: Arc<dyn BlobStorePort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            metadata,
            blobs,
            clock,
            mutation_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Store a new fragment. The caller may pin an id; otherwise one is
    /// generated. Returns the stored metadata record.
    pub async fn create(
        &self,
        data: &[u8],
        content_type: &str,
        raw_owner: &str,
        id: Option<FragmentId>,
    ) -> Result<FragmentRecord, FragmentError> {
        if data.is_empty() {
            return Err(FragmentError::Validation("fragment body must not be empty"));
        }
        if content_type.is_empty() {
            return Err(FragmentError::Validation("content type must not be empty"));
        }
        if raw_owner.is_empty() {
            return Err(FragmentError::Validation(
                "owner identity must not be empty",
            ));
        }
        if !convert::is_ingestible(content_type) {
            return Err(FragmentError::UnsupportedType {
                content_type: content_type.to_string(),
                valid: convert::ingestible_types(),
            });
        }

        let owner_key = OwnerKey::derive(raw_owner);
        let record = FragmentRecord::new(
            id.unwrap_or_default(),
            owner_key,
            content_type,
            data.len() as u64,
            self.clock.now(),
        );
        let key = record.blob_key();

        let lock = self.mutation_lock(&key);
        let guard = lock.lock().await;

        let result = self.create_locked(&record, &key, data).await;

        drop(guard);
        drop(lock);
        self.release_mutation_lock(&key);

        result.map(|()| {
            debug!(key = %key, size = record.size, "fragment created");
            record
        })
    }

    async fn create_locked(
        &self,
        record: &FragmentRecord,
        key: &BlobKey,
        data: &[u8],
    ) -> Result<(), FragmentError> {
        // A record is immutable in id, owner and content type, so a create
        // must never land on an id that already exists, whoever owns it.
        let existing = self
            .metadata
            .get_by_id(&record.id)
            .await
            .map_err(|e| FragmentError::store_io("metadata", record.id.as_str(), e))?;
        if existing.is_some() {
            warn!(key = %key, "create rejected, id already in use");
            return Err(FragmentError::IdInUse {
                id: record.id.as_str().to_string(),
            });
        }

        // Blob first; metadata only once the bytes are durable.
        self.write_pair(record, key, data, None).await
    }

    /// Fetch a fragment by id for the given owner. Absent ids and ids
    /// owned by someone else are both `None`; the caller cannot tell the
    /// difference.
    pub async fn get(
        &self,
        id: &FragmentId,
        raw_owner: &str,
        include_data: bool,
    ) -> Result<Option<Fragment>, FragmentError> {
        let owner_key = OwnerKey::derive(raw_owner);
        let Some(metadata) = self.owned_record(id, &owner_key).await? else {
            return Ok(None);
        };

        let data = if include_data {
            Some(self.require_blob(&metadata).await?)
        } else {
            None
        };

        Ok(Some(Fragment { metadata, data }))
    }

    /// Fetch a fragment and convert its content to the representation
    /// named by `extension` (the GET `:id.ext` form of the read path).
    pub async fn get_as(
        &self,
        id: &FragmentId,
        raw_owner: &str,
        extension: &str,
    ) -> Result<Option<ConvertedFragment>, FragmentError> {
        let owner_key = OwnerKey::derive(raw_owner);
        let Some(metadata) = self.owned_record(id, &owner_key).await? else {
            return Ok(None);
        };
        let data = self.require_blob(&metadata).await?;

        match convert::convert(&data, &metadata.content_type, extension).await {
            Ok(converted) => {
                let content_type = convert::canonical_content_type(extension)
                    .unwrap_or(metadata.content_type.as_str())
                    .to_string();
                Ok(Some(ConvertedFragment {
                    metadata,
                    content_type,
                    data: converted,
                }))
            }
            Err(err @ ConvertError::TransformFailed { .. }) => Err(FragmentError::Convert(err)),
            Err(_) => Err(FragmentError::UnsupportedConversion {
                content_type: metadata.content_type.clone(),
                extension: extension.to_string(),
                valid: convert::valid_extensions(&metadata.content_type),
            }),
        }
    }

    /// List the owner's fragments: bare ids, or full records when
    /// `expand` is set.
    pub async fn list_for_owner(
        &self,
        raw_owner: &str,
        expand: bool,
    ) -> Result<FragmentListing, FragmentError> {
        let owner_key = OwnerKey::derive(raw_owner);
        let records = self
            .metadata
            .list_by_owner(&owner_key)
            .await
            .map_err(|e| FragmentError::store_io("metadata", owner_key.short_hex(), e))?;

        Ok(if expand {
            FragmentListing::Records(records)
        } else {
            FragmentListing::Ids(records.into_iter().map(|r| r.id).collect())
        })
    }

    /// Replace a fragment's content. Identity is stable: `id`,
    /// `owner_key`, `content_type` and `created` survive every update,
    /// only `size` and `updated` move. `None` when the fragment does not
    /// exist for this owner, or when the new body is empty.
    pub async fn update(
        &self,
        id: &FragmentId,
        raw_owner: &str,
        new_data: &[u8],
    ) -> Result<Option<FragmentRecord>, FragmentError> {
        if new_data.is_empty() {
            return Ok(None);
        }

        let owner_key = OwnerKey::derive(raw_owner);
        let key = BlobKey::new(owner_key.clone(), id.clone());

        let lock = self.mutation_lock(&key);
        let guard = lock.lock().await;

        let result = self.update_locked(id, &owner_key, &key, new_data).await;

        drop(guard);
        drop(lock);
        self.release_mutation_lock(&key);
        result
    }

    async fn update_locked(
        &self,
        id: &FragmentId,
        owner_key: &OwnerKey,
        key: &BlobKey,
        new_data: &[u8],
    ) -> Result<Option<FragmentRecord>, FragmentError> {
        let Some(record) = self.owned_record(id, owner_key).await? else {
            return Ok(None);
        };

        // The previous bytes back the compensating write below.
        let previous = self.require_blob(&record).await?;

        let mut updated = record;
        updated.touch(new_data.len() as u64, self.clock.now());

        self.write_pair(&updated, key, new_data, Some(&previous))
            .await?;

        debug!(key = %key, size = updated.size, "fragment updated");
        Ok(Some(updated))
    }

    /// Remove a fragment. Metadata goes first (it is the source of truth
    /// for existence); a blob-delete failure afterwards still reports the
    /// fragment as deleted and leaves the orphan to the out-of-band sweep.
    pub async fn delete(
        &self,
        id: &FragmentId,
        raw_owner: &str,
    ) -> Result<Option<FragmentRecord>, FragmentError> {
        let owner_key = OwnerKey::derive(raw_owner);
        let key = BlobKey::new(owner_key.clone(), id.clone());

        let lock = self.mutation_lock(&key);
        let guard = lock.lock().await;

        let result = self.delete_locked(id, &owner_key, &key).await;

        drop(guard);
        drop(lock);
        self.release_mutation_lock(&key);
        result
    }

    async fn delete_locked(
        &self,
        id: &FragmentId,
        owner_key: &OwnerKey,
        key: &BlobKey,
    ) -> Result<Option<FragmentRecord>, FragmentError> {
        let Some(record) = self.owned_record(id, owner_key).await? else {
            return Ok(None);
        };

        let removed = self
            .metadata
            .delete_by_id(id)
            .await
            .map_err(|e| FragmentError::store_io("metadata", key.storage_key(), e))?
            .unwrap_or(record);

        match self.blobs.delete(key).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(key = %key, "blob already missing while deleting fragment");
            }
            Err(err) => {
                error!(
                    key = %key,
                    error = %err,
                    "blob delete failed after metadata removal; blob orphaned until sweep"
                );
            }
        }

        debug!(key = %key, "fragment deleted");
        Ok(Some(removed))
    }

    /// Stateless conversion of caller-supplied bytes; delegates to the
    /// conversion engine.
    pub async fn convert(
        &self,
        data: &[u8],
        content_type: &str,
        extension: &str,
    ) -> Result<Bytes, ConvertError> {
        convert::convert(data, content_type, extension).await
    }

    /// Two-phase write: blob, then metadata. On metadata failure the blob
    /// side is compensated best-effort — deleted for a create, restored
    /// to `previous` for an update — and the original error surfaces.
    async fn write_pair(
        &self,
        record: &FragmentRecord,
        key: &BlobKey,
        data: &[u8],
        previous: Option<&Bytes>,
    ) -> Result<(), FragmentError> {
        self.blobs
            .put(key, data)
            .await
            .map_err(|e| FragmentError::store_io("blob", key.storage_key(), e))?;

        if let Err(err) = self.metadata.put(record).await {
            warn!(key = %key, "metadata write failed after blob write, compensating");
            let compensation = match previous {
                Some(old) => self.blobs.put(key, old).await,
                None => self.blobs.delete(key).await.map(|_| ()),
            };
            if let Err(comp) = compensation {
                error!(
                    key = %key,
                    error = %comp,
                    "blob compensation failed; blob orphaned until sweep"
                );
            }
            return Err(FragmentError::store_io("metadata", key.storage_key(), err));
        }

        Ok(())
    }

    async fn owned_record(
        &self,
        id: &FragmentId,
        owner_key: &OwnerKey,
    ) -> Result<Option<FragmentRecord>, FragmentError> {
        let record = self
            .metadata
            .get_by_id(id)
            .await
            .map_err(|e| FragmentError::store_io("metadata", id.as_str(), e))?;

        Ok(record.filter(|r| r.is_owned_by(owner_key)))
    }

    /// Fetch the blob paired with an existing metadata record. A missing
    /// blob here is a consistency violation, not a "not found".
    async fn require_blob(&self, record: &FragmentRecord) -> Result<Bytes, FragmentError> {
        let key = record.blob_key();
        let blob = self
            .blobs
            .get(&key)
            .await
            .map_err(|e| FragmentError::store_io("blob", key.storage_key(), e))?;

        blob.ok_or_else(|| {
            error!(key = %key, "metadata exists but blob is missing");
            FragmentError::Consistency {
                key: key.storage_key(),
                detail: "metadata record exists but its blob is missing",
            }
        })
    }

    fn mutation_lock(&self, key: &BlobKey) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .mutation_locks
            .lock()
            .expect("mutation lock map poisoned");
        locks
            .entry(key.storage_key())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Drop the map entry once no mutation holds the lock anymore. The
    /// caller must drop its own clone first, otherwise the entry is
    /// pinned and the map grows without bound.
    fn release_mutation_lock(&self, key: &BlobKey) {
        let mut locks = self
            .mutation_locks
            .lock()
            .expect("mutation lock map poisoned");
        let storage_key = key.storage_key();
        if locks
            .get(&storage_key)
            .is_some_and(|m| Arc::strong_count(m) == 1)
        {
            locks.remove(&storage_key);
        }
    }
}

#[cfg(test)]
mod tests;
