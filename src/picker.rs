//! Local photo selection.
//!
//! Browsing is deliberately one directory deep: the picker mirrors a
//! file-input dialog filtered to the image types the service accepts.

use crate::model::SelectedPhoto;
use anyhow::{bail, Context, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Extensions the inference service accepts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Upload cap enforced by the service (16 MiB). Checked here so an
/// oversized file fails before any bytes leave the machine.
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// MIME type for a supported image path, by extension (case-insensitive).
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

pub fn is_supported_image(path: &Path) -> bool {
    mime_for_path(path).is_some()
}

/// List the supported images directly inside `dir`, sorted by file name
/// (case-insensitive). Hidden files and subdirectories are skipped.
pub fn list_photos(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(dir)
        .with_context(|| format!("cannot read directory {}", dir.display()))?;

    let mut photos = Vec::new();
    for entry in read_dir {
        let Ok(entry) = entry else { continue };
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if is_supported_image(&path) {
            photos.push(path);
        }
    }

    photos.sort_by_key(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });
    Ok(photos)
}

/// Read a photo from disk, enforcing the extension allow-list and the
/// upload cap.
pub fn load_photo(path: &Path) -> Result<SelectedPhoto> {
    let Some(mime) = mime_for_path(path) else {
        bail!(
            "{} is not a supported image (expected {})",
            path.display(),
            ALLOWED_EXTENSIONS.join("/")
        );
    };

    let meta =
        std::fs::metadata(path).with_context(|| format!("cannot read {}", path.display()))?;
    if meta.len() > MAX_UPLOAD_BYTES {
        bail!(
            "{} is {} bytes; the service accepts at most {} bytes",
            path.display(),
            meta.len(),
            MAX_UPLOAD_BYTES
        );
    }

    let data = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "photo".to_string());

    Ok(SelectedPhoto {
        path: path.to_path_buf(),
        file_name,
        mime,
        data: Bytes::from(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_mapping_is_case_insensitive() {
        assert_eq!(mime_for_path(Path::new("a/DOG.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("b.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("c.PNG")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("d.gif")), None);
        assert_eq!(mime_for_path(Path::new("noext")), None);
    }

    #[test]
    fn listing_keeps_only_supported_images_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta.png", "Alpha.JPG", "notes.txt", ".hidden.jpg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let photos = list_photos(dir.path()).unwrap();
        let names: Vec<_> = photos
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Alpha.JPG", "zeta.png"]);
    }

    #[test]
    fn load_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let err = load_photo(&path).unwrap_err();
        assert!(err.to_string().contains("not a supported image"));
    }

    #[test]
    fn load_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.jpg");
        let file = std::fs::File::create(&path).unwrap();
        // Sparse file: the length check fires before any read.
        file.set_len(MAX_UPLOAD_BYTES + 1).unwrap();

        let err = load_photo(&path).unwrap_err();
        assert!(err.to_string().contains("at most"));
    }

    #[test]
    fn load_reads_bytes_and_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rex.png");
        std::fs::write(&path, b"fakepng").unwrap();

        let photo = load_photo(&path).unwrap();
        assert_eq!(photo.path, path);
        assert_eq!(photo.file_name, "rex.png");
        assert_eq!(photo.mime, "image/png");
        assert_eq!(photo.data.as_ref(), b"fakepng");
    }
}
