//! Upload loading: turns a user-selected file into an [`UploadedImage`].
//!
//! This is the upload control's type filter. Only files whose extension is in
//! [`UploadConfig::accepted_extensions`] get through, and the declared media
//! type comes from that extension (`jpg` is an alias of `image/jpeg`). A cheap
//! magic-byte sniff catches files whose content contradicts their name; full
//! decodability is left to the preview.

use std::path::{Path, PathBuf};

use crate::config::{LimitsConfig, UploadConfig};
use crate::error::UploadError;

/// A user-supplied image, held in memory for the lifetime of one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    bytes: Vec<u8>,
    media_type: String,
    file_name: String,
}

impl UploadedImage {
    /// Wrap bytes that are already in memory.
    pub fn from_bytes(
        bytes: Vec<u8>,
        media_type: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
            file_name: file_name.into(),
        }
    }

    /// Load and filter a file from disk.
    ///
    /// Checks, in order: the file exists, its extension is accepted, it is
    /// non-empty and within the size limit, and its header matches the
    /// declared type.
    pub fn load(
        path: &Path,
        upload: &UploadConfig,
        limits: &LimitsConfig,
    ) -> Result<Self, UploadError> {
        if !path.is_file() {
            return Err(UploadError::FileNotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let media_type = upload
            .accepted_extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(&extension))
            .then(|| media_type_for_extension(&extension))
            .flatten()
            .ok_or_else(|| UploadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: if extension.is_empty() {
                    "(none)".to_string()
                } else {
                    extension.clone()
                },
                accepted: upload.accepted_list(),
            })?;

        let metadata = std::fs::metadata(path).map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let max_bytes = limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if metadata.len() > max_bytes {
            return Err(UploadError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: limits.max_file_size_mb,
            });
        }

        let bytes = std::fs::read(path).map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if bytes.is_empty() {
            return Err(UploadError::Empty(path.to_path_buf()));
        }

        if !header_matches(&bytes, media_type) {
            return Err(UploadError::InvalidImage {
                path: path.to_path_buf(),
                media_type: media_type.to_string(),
            });
        }

        tracing::debug!(
            path = %path.display(),
            media_type,
            size = bytes.len(),
            "Loaded upload"
        );

        Ok(Self {
            bytes,
            media_type: media_type.to_string(),
            file_name: file_name_of(path),
        })
    }

    /// Raw file content.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared MIME type (e.g. "image/jpeg").
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// File name shown in captions and output records.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the upload holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Map a file extension to the MIME type the upload declares for it.
pub fn media_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| PathBuf::from(path).display().to_string())
}

/// Check the file signature against the declared media type.
fn header_matches(bytes: &[u8], media_type: &str) -> bool {
    match media_type {
        "image/jpeg" => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
        "image/png" => bytes.starts_with(&[0x89, b'P', b'N', b'G']),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 10] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    const JPEG_HEADER: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_media_type_for_extension() {
        assert_eq!(media_type_for_extension("jpg"), Some("image/jpeg"));
        assert_eq!(media_type_for_extension("JPEG"), Some("image/jpeg"));
        assert_eq!(media_type_for_extension("png"), Some("image/png"));
        assert_eq!(media_type_for_extension("gif"), None);
        assert_eq!(media_type_for_extension("webp"), None);
    }

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "salad.png", &PNG_HEADER);

        let image =
            UploadedImage::load(&path, &UploadConfig::default(), &LimitsConfig::default()).unwrap();
        assert_eq!(image.media_type(), "image/png");
        assert_eq!(image.bytes(), &PNG_HEADER);
        assert_eq!(image.file_name(), "salad.png");
    }

    #[test]
    fn test_load_jpg_alias_declares_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "toast.JPG", &JPEG_HEADER);

        let image =
            UploadedImage::load(&path, &UploadConfig::default(), &LimitsConfig::default()).unwrap();
        assert_eq!(image.media_type(), "image/jpeg");
    }

    #[test]
    fn test_load_rejects_unaccepted_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "pizza.webp", b"RIFF\0\0\0\0WEBPVP8 ");

        let err = UploadedImage::load(&path, &UploadConfig::default(), &LimitsConfig::default())
            .unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedFormat { .. }));
        assert!(err.to_string().contains("jpg, jpeg, png"));
    }

    #[test]
    fn test_load_rejects_webp_even_when_listed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "pizza.webp", b"RIFF\0\0\0\0WEBPVP8 ");
        let upload = UploadConfig {
            accepted_extensions: vec!["png".to_string(), "webp".to_string()],
        };

        let err = UploadedImage::load(&path, &upload, &LimitsConfig::default()).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_load_with_huge_size_limit_does_not_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "salad.png", &PNG_HEADER);
        let limits = LimitsConfig {
            max_file_size_mb: u64::MAX / 1024,
            ..LimitsConfig::default()
        };

        let image = UploadedImage::load(&path, &UploadConfig::default(), &limits).unwrap();
        assert_eq!(image.len(), PNG_HEADER.len());
    }

    #[test]
    fn test_load_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");

        let err = UploadedImage::load(&path, &UploadConfig::default(), &LimitsConfig::default())
            .unwrap_err();
        assert!(matches!(err, UploadError::FileNotFound(_)));
    }

    #[test]
    fn test_load_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.png", &[]);

        let err = UploadedImage::load(&path, &UploadConfig::default(), &LimitsConfig::default())
            .unwrap_err();
        assert!(matches!(err, UploadError::Empty(_)));
    }

    #[test]
    fn test_load_rejects_mismatched_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "notes.png", b"just some text");

        let err = UploadedImage::load(&path, &UploadConfig::default(), &LimitsConfig::default())
            .unwrap_err();
        assert!(matches!(err, UploadError::InvalidImage { .. }));
    }

    #[test]
    fn test_load_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = PNG_HEADER.to_vec();
        bytes.resize(2 * 1024 * 1024, 0);
        let path = write_file(&dir, "huge.png", &bytes);

        let limits = LimitsConfig {
            max_file_size_mb: 1,
            ..LimitsConfig::default()
        };
        let err = UploadedImage::load(&path, &UploadConfig::default(), &limits).unwrap_err();
        assert!(matches!(err, UploadError::FileTooLarge { max_mb: 1, .. }));
    }
}
