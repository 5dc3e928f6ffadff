//! # frag-app
//!
//! Use-case layer of the fragment store: composes the metadata and blob
//! store ports into atomic-looking create/get/list/update/delete
//! operations and owns the cross-store consistency discipline.

pub mod store;

pub use store::{ConvertedFragment, Fragment, FragmentListing, FragmentStore};
