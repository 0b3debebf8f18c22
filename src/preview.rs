//! Client-side photo preview.
//!
//! Derived synchronously when a photo is selected, before any request
//! starts: a `data:` URI of the untouched file bytes plus a small RGB
//! thumbnail the terminal view paints with half-block cells.

use crate::model::SelectedPhoto;
use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use image::{GenericImageView, RgbImage};

/// Longest thumbnail edge in pixels. Two vertical pixels share one
/// character cell, so this stays small.
const THUMBNAIL_EDGE: u32 = 96;

#[derive(Debug, Clone)]
pub struct PhotoPreview {
    /// base64 `data:` URI of the raw file bytes, exactly what a browser
    /// file reader would produce for the same file.
    pub data_uri: String,
    /// Source image dimensions in pixels.
    pub width: u32,
    pub height: u32,
    /// Downscaled RGB copy for terminal rendering.
    pub thumbnail: RgbImage,
}

/// Decode the photo and build its preview. Fails on undecodable bytes;
/// callers decide whether that blocks the upload (it does not).
pub fn build_preview(photo: &SelectedPhoto) -> Result<PhotoPreview> {
    let decoded = image::load_from_memory(&photo.data)
        .with_context(|| format!("cannot decode {}", photo.file_name))?;
    let (width, height) = decoded.dimensions();
    let thumbnail = decoded.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgb8();

    Ok(PhotoPreview {
        data_uri: encode_data_uri(photo.mime, &photo.data),
        width,
        height,
        thumbnail,
    })
}

pub fn encode_data_uri(mime: &str, data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(data)
    )
}
