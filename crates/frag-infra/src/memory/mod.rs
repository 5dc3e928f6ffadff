//! In-process adapters backing both stores with plain collections.
//! Useful for tests and single-node deployments with no external
//! backends.

mod blob_store;
mod metadata_store;

pub use blob_store::MemoryBlobStore;
pub use metadata_store::MemoryMetadataStore;
