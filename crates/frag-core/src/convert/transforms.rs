//! The individual content transforms behind the conversion table.
//!
//! Text transforms are pure string operations; image transforms decode
//! with the `image` crate and re-encode to the target format.

use anyhow::{Context, Result};
use image::ImageFormat;
use pulldown_cmark::{html, Parser};

fn utf8(data: &[u8]) -> Result<&str> {
    std::str::from_utf8(data).context("fragment bytes are not valid utf-8")
}

pub(crate) fn markdown_to_html(data: &[u8]) -> Result<Vec<u8>> {
    let markdown = utf8(data)?;
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(markdown));
    Ok(out.into_bytes())
}

pub(crate) fn markdown_to_text(data: &[u8]) -> Result<Vec<u8>> {
    let rendered = markdown_to_html(data)?;
    html_to_text(&rendered)
}

pub(crate) fn html_to_markdown(data: &[u8]) -> Result<Vec<u8>> {
    let html = utf8(data)?;
    Ok(html2md::parse_html(html).into_bytes())
}

pub(crate) fn html_to_text(data: &[u8]) -> Result<Vec<u8>> {
    let html = utf8(data)?;
    Ok(strip_tags(html).into_bytes())
}

pub(crate) fn json_to_text(data: &[u8]) -> Result<Vec<u8>> {
    let value: serde_json::Value =
        serde_json::from_slice(data).context("fragment bytes are not valid json")?;
    Ok(serde_json::to_string(&value)?.into_bytes())
}

/// Drop everything between `<` and `>`, keeping the text in between.
/// Entities are left as-is; this mirrors plain tag stripping, not a full
/// HTML-to-text renderer.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

pub(crate) fn transcode_image(data: &[u8], target: ImageFormat) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(data).context("decode image bytes")?;

    // JPEG has no alpha channel; everything else round-trips through RGBA.
    let normalized = match target {
        ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(decoded.to_rgb8()),
        _ => image::DynamicImage::ImageRgba8(decoded.to_rgba8()),
    };

    let mut out = std::io::Cursor::new(Vec::new());
    normalized
        .write_to(&mut out, target)
        .with_context(|| format!("encode image as {:?}", target))?;
    Ok(out.into_inner())
}
