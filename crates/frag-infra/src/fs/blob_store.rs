use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use log::{error, info};
use tokio::fs;

use frag_core::ports::BlobStorePort;
use frag_core::BlobKey;

/// Blob store rooted at a filesystem directory.
///
/// A blob lives at `<root>/<owner_hex>/<id>`, mirroring the canonical
/// `<owner_hex>/<id>` addressing of the key space. Absent files read as
/// `None`; every other I/O failure propagates with store and key context.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a new FsBlobStore rooted at the given filesystem path.
    /// The directory tree is created lazily on first write.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn blob_path(&self, key: &BlobKey) -> PathBuf {
        self.root
            .join(key.owner_key.to_hex())
            .join(key.id.as_str())
    }
}

#[async_trait]
impl BlobStorePort for FsBlobStore {
    async fn put(&self, key: &BlobKey, data: &[u8]) -> Result<()> {
        let path = self.blob_path(key);
        let dir = path
            .parent()
            .context("blob path has no parent directory")?;
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create blob directory for key {}", key))?;
        fs::write(&path, data)
            .await
            .with_context(|| format!("write blob for key {}", key))?;
        Ok(())
    }

    async fn get(&self, key: &BlobKey) -> Result<Option<Bytes>> {
        let path = self.blob_path(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(Bytes::from(bytes))),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => {
                error!("Error reading blob for key {}: {}", key, err);
                Err(err).with_context(|| format!("read blob for key {}", key))
            }
        }
    }

    async fn delete(&self, key: &BlobKey) -> Result<bool> {
        let path = self.blob_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("Blob deleted for key {}", key);
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => {
                error!("Error deleting blob for key {}: {}", key, err);
                Err(err).with_context(|| format!("delete blob for key {}", key))
            }
        }
    }
}
