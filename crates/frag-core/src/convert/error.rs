use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// No registered content type claims this extension as canonical.
    #[error("no content type registers extension {extension:?}")]
    UnknownExtension { extension: String },

    /// The source content type is not in the conversion table.
    #[error("content type {content_type:?} is not registered for conversion")]
    UnsupportedSource { content_type: String },

    /// The extension exists but is not a valid target for this source type.
    #[error("cannot convert {content_type:?} to {extension:?}; valid conversions are: {}", .valid.join(", "))]
    InvalidConversion {
        content_type: String,
        extension: String,
        valid: Vec<&'static str>,
    },

    /// A registered transform failed on the given bytes. Propagated to the
    /// caller as-is, never swallowed.
    #[error("transform to {extension:?} failed")]
    TransformFailed {
        extension: String,
        #[source]
        source: anyhow::Error,
    },
}
