//! Port interfaces implemented by the storage adapters.
//!
//! Ports define the contract between the fragment-store orchestration
//! logic and infrastructure implementations, keeping the core independent
//! of any particular backend. A metadata store and a blob store are
//! independently reachable and independently failing collaborators; the
//! orchestrator owns the consistency discipline between them.

mod blob_store;
mod clock;
mod metadata_store;

pub use blob_store::BlobStorePort;
pub use clock::ClockPort;
pub use metadata_store::MetadataStorePort;
