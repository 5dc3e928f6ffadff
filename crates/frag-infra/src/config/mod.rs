use std::path::PathBuf;

use serde::Deserialize;

/// Storage configuration for the two backends.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the filesystem blob store.
    pub blob_root: PathBuf,
    /// SQLite database URL for the metadata store.
    pub database_url: String,
}

impl StorageConfig {
    pub fn defaults() -> Self {
        Self {
            blob_root: PathBuf::from("data/blobs"),
            database_url: "data/fragments.sqlite".to_string(),
        }
    }

    /// Defaults overridden by `FRAG_BLOB_ROOT` / `FRAG_DATABASE_URL`.
    pub fn from_env() -> Self {
        let mut config = Self::defaults();
        if let Ok(root) = std::env::var("FRAG_BLOB_ROOT") {
            config.blob_root = PathBuf::from(root);
        }
        if let Ok(url) = std::env::var("FRAG_DATABASE_URL") {
            config.database_url = url;
        }
        config
    }
}
