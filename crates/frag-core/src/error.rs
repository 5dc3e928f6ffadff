//! Error taxonomy of the fragment store.
//!
//! Not-found and foreign-owner lookups are deliberately *not* errors:
//! operations return `Ok(None)` for both so that existence never leaks
//! across owners.

use thiserror::Error;

use crate::convert::ConvertError;

#[derive(Debug, Error)]
pub enum FragmentError {
    /// Rejected before any store I/O; never retried.
    #[error("invalid request: {0}")]
    Validation(&'static str),

    /// Create with a pinned id that already names a record. Records are
    /// immutable in id, owner and content type; replacing one through a
    /// second create is never allowed.
    #[error("fragment id {id:?} already exists")]
    IdInUse { id: String },

    /// Content type is not registered for ingestion.
    #[error("unsupported media type {content_type:?}; valid types are: {}", .valid.join(", "))]
    UnsupportedType {
        content_type: String,
        valid: Vec<&'static str>,
    },

    /// Requested target extension is not valid for the fragment's type.
    #[error("unsupported conversion of {content_type:?} to {extension:?}; valid conversions are: {}", .valid.join(", "))]
    UnsupportedConversion {
        content_type: String,
        extension: String,
        valid: Vec<&'static str>,
    },

    /// A registered transform itself failed on the fragment's bytes.
    #[error(transparent)]
    Convert(ConvertError),

    /// Transient failure talking to a backend. Carries enough context to
    /// diagnose (which store, which key); never downgraded to "not found".
    #[error("{store} store failure for key {key}")]
    StoreIo {
        store: &'static str,
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Metadata and blob disagree about existence. Fatal: it means the
    /// write compensation failed at some point. Never auto-repaired.
    #[error("cross-store consistency violation for key {key}: {detail}")]
    Consistency { key: String, detail: &'static str },
}

impl FragmentError {
    pub fn store_io(store: &'static str, key: impl Into<String>, source: anyhow::Error) -> Self {
        Self::StoreIo {
            store,
            key: key.into(),
            source,
        }
    }
}
