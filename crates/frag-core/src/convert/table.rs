//! Static conversion registry.
//!
//! Each source content type maps to an ordered list of target extensions.
//! The first entry is the type's canonical extension and is always
//! identity-mapped; further `Identity` entries express aliasing (`jpg`
//! alongside `jpeg`).

use image::ImageFormat;

use super::transforms;

pub(crate) type TextTransform = fn(&[u8]) -> anyhow::Result<Vec<u8>>;

pub(crate) enum Transform {
    /// Source and target are the same representation; bytes pass through.
    Identity,
    /// Pure string transform.
    Text(TextTransform),
    /// Decode and re-encode to the given raster format.
    Image(ImageFormat),
}

pub(crate) struct TypeEntry {
    pub content_type: &'static str,
    pub targets: &'static [(&'static str, Transform)],
}

pub(crate) static CONVERSION_TABLE: &[TypeEntry] = &[
    TypeEntry {
        content_type: "text/plain",
        targets: &[("txt", Transform::Identity)],
    },
    TypeEntry {
        content_type: "text/plain; charset=utf-8",
        targets: &[("txt", Transform::Identity)],
    },
    TypeEntry {
        content_type: "text/markdown",
        targets: &[
            ("md", Transform::Identity),
            ("html", Transform::Text(transforms::markdown_to_html)),
            ("txt", Transform::Text(transforms::markdown_to_text)),
        ],
    },
    TypeEntry {
        content_type: "text/html",
        targets: &[
            ("html", Transform::Identity),
            ("md", Transform::Text(transforms::html_to_markdown)),
            ("txt", Transform::Text(transforms::html_to_text)),
        ],
    },
    TypeEntry {
        content_type: "application/json",
        targets: &[
            ("json", Transform::Identity),
            ("txt", Transform::Text(transforms::json_to_text)),
        ],
    },
    TypeEntry {
        content_type: "image/png",
        targets: &[
            ("png", Transform::Identity),
            ("jpeg", Transform::Image(ImageFormat::Jpeg)),
            ("jpg", Transform::Image(ImageFormat::Jpeg)),
            ("webp", Transform::Image(ImageFormat::WebP)),
            ("gif", Transform::Image(ImageFormat::Gif)),
        ],
    },
    TypeEntry {
        content_type: "image/jpeg",
        targets: &[
            ("jpeg", Transform::Identity),
            ("jpg", Transform::Identity),
            ("png", Transform::Image(ImageFormat::Png)),
            ("webp", Transform::Image(ImageFormat::WebP)),
            ("gif", Transform::Image(ImageFormat::Gif)),
        ],
    },
    TypeEntry {
        content_type: "image/webp",
        targets: &[
            ("webp", Transform::Identity),
            ("png", Transform::Image(ImageFormat::Png)),
            ("jpeg", Transform::Image(ImageFormat::Jpeg)),
            ("jpg", Transform::Image(ImageFormat::Jpeg)),
            ("gif", Transform::Image(ImageFormat::Gif)),
        ],
    },
    TypeEntry {
        content_type: "image/gif",
        targets: &[
            ("gif", Transform::Identity),
            ("png", Transform::Image(ImageFormat::Png)),
            ("jpeg", Transform::Image(ImageFormat::Jpeg)),
            ("jpg", Transform::Image(ImageFormat::Jpeg)),
            ("webp", Transform::Image(ImageFormat::WebP)),
        ],
    },
];

pub(crate) fn lookup(content_type: &str) -> Option<&'static TypeEntry> {
    CONVERSION_TABLE
        .iter()
        .find(|entry| entry.content_type == content_type)
}
