//! # frag-core
//!
//! Core domain models and business logic for the fragment store.
//!
//! This crate contains pure domain logic without any infrastructure
//! dependencies: the fragment data model, the owner-key access-control
//! primitive, the content-conversion table and engine, and the port
//! traits implemented by the storage adapters.

pub mod convert;
pub mod error;
pub mod fragment;
pub mod ids;
pub mod ports;

// Re-export commonly used types at the crate root
pub use error::FragmentError;
pub use fragment::{BlobKey, FragmentRecord, OwnerKey};
pub use ids::FragmentId;
