//! Content conversion engine.
//!
//! Validates ingestion types against the static registry, enumerates valid
//! target extensions for a type, resolves extensions back to their
//! canonical content type, and executes a requested transcoding.

mod error;
mod table;
mod transforms;

use bytes::Bytes;

use table::{lookup, Transform, CONVERSION_TABLE};

pub use error::ConvertError;

/// True iff the content type is registered as an ingestion source.
pub fn is_ingestible(content_type: &str) -> bool {
    lookup(content_type).is_some()
}

/// All content types accepted for ingestion, in registry order.
pub fn ingestible_types() -> Vec<&'static str> {
    CONVERSION_TABLE
        .iter()
        .map(|entry| entry.content_type)
        .collect()
}

/// Target extensions registered for a source type, canonical extension
/// first. Empty when the type is not registered.
pub fn valid_extensions(content_type: &str) -> Vec<&'static str> {
    lookup(content_type)
        .map(|entry| entry.targets.iter().map(|(ext, _)| *ext).collect())
        .unwrap_or_default()
}

/// Resolve an extension to the one content type that claims it as an
/// identity (canonical) entry. Lookup is on identity mappings only, never
/// on types that merely support converting *to* the extension.
pub fn canonical_content_type(extension: &str) -> Option<&'static str> {
    CONVERSION_TABLE.iter().find_map(|entry| {
        entry
            .targets
            .iter()
            .any(|(ext, transform)| *ext == extension && matches!(transform, Transform::Identity))
            .then_some(entry.content_type)
    })
}

/// Convert `data` from its content type to the representation named by
/// `to_extension`.
///
/// Identity conversions (source and target resolve to the same type, which
/// also covers aliasing such as `jpg` vs `jpeg`) return the input bytes
/// unchanged. The entry point is async so callers await uniformly whether
/// or not a given transform suspends.
pub async fn convert(
    data: &[u8],
    from_content_type: &str,
    to_extension: &str,
) -> Result<Bytes, ConvertError> {
    let Some(target_type) = canonical_content_type(to_extension) else {
        return Err(ConvertError::UnknownExtension {
            extension: to_extension.to_string(),
        });
    };

    let Some(entry) = lookup(from_content_type) else {
        return Err(ConvertError::UnsupportedSource {
            content_type: from_content_type.to_string(),
        });
    };

    let Some((_, transform)) = entry.targets.iter().find(|(ext, _)| *ext == to_extension) else {
        return Err(ConvertError::InvalidConversion {
            content_type: from_content_type.to_string(),
            extension: to_extension.to_string(),
            valid: valid_extensions(from_content_type),
        });
    };

    // Self-conversion: no transform to run.
    if target_type == entry.content_type || matches!(transform, Transform::Identity) {
        return Ok(Bytes::copy_from_slice(data));
    }

    let result = match transform {
        Transform::Identity => unreachable!("identity handled above"),
        Transform::Text(f) => f(data),
        Transform::Image(format) => transforms::transcode_image(data, *format),
    };

    result
        .map(Bytes::from)
        .map_err(|source| ConvertError::TransformFailed {
            extension: to_extension.to_string(),
            source,
        })
}
