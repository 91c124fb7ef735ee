//! Image preview: decodes the upload and renders it for the terminal.
//!
//! This is where decodability is checked. The adapter never looks inside the
//! bytes, so an upload only reaches the analysis step after a preview has
//! been built from it.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::AnalysisError;
use crate::upload::UploadedImage;

/// A decoded upload, ready to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Detected format ("jpeg", "png", ...)
    pub format: String,
    /// Upload size in bytes
    pub file_size: u64,
    /// ANSI truecolor lines, two pixel rows per line
    pub lines: Vec<String>,
}

impl ImagePreview {
    /// Decode an upload under the configured timeout and dimension limit.
    ///
    /// `columns` is the preview width in terminal cells; 0 skips rendering.
    pub async fn decode(
        upload: &UploadedImage,
        limits: &LimitsConfig,
        columns: u32,
    ) -> Result<Self, AnalysisError> {
        let bytes = upload.bytes().to_vec();
        let timeout_duration = Duration::from_millis(limits.decode_timeout_ms);

        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || decode_sync(&bytes)).await
        })
        .await;

        let (image, format) = match decode_result {
            Ok(Ok(Ok(decoded))) => decoded,
            Ok(Ok(Err(e))) => return Err(e),
            Ok(Err(e)) => {
                return Err(AnalysisError::Decode {
                    message: format!("Task join error: {e}"),
                })
            }
            Err(_) => {
                return Err(AnalysisError::Timeout {
                    timeout_ms: limits.decode_timeout_ms,
                })
            }
        };

        let (width, height) = image.dimensions();
        if width > limits.max_image_dimension || height > limits.max_image_dimension {
            return Err(AnalysisError::ImageTooLarge {
                width,
                height,
                max_dim: limits.max_image_dimension,
            });
        }

        let lines = if columns > 0 {
            render_half_blocks(&image, columns)
        } else {
            Vec::new()
        };

        Ok(Self {
            width,
            height,
            format: format_to_string(format),
            file_size: upload.len() as u64,
            lines,
        })
    }

    /// One-line caption, e.g. "lunch.jpg · 1024x768 jpeg · 183.2 KB".
    pub fn caption(&self, file_name: &str) -> String {
        format!(
            "{file_name} \u{b7} {}x{} {} \u{b7} {:.1} KB",
            self.width,
            self.height,
            self.format,
            self.file_size as f64 / 1024.0
        )
    }
}

/// Synchronous decode (runs in spawn_blocking).
fn decode_sync(bytes: &[u8]) -> Result<(DynamicImage, ImageFormat), AnalysisError> {
    let reader = image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AnalysisError::Decode {
            message: format!("Cannot detect image format: {e}"),
        })?;
    let format = reader.format().ok_or_else(|| AnalysisError::Decode {
        message: "Unrecognized image format".to_string(),
    })?;
    let image = reader.decode().map_err(|e| AnalysisError::Decode {
        message: e.to_string(),
    })?;
    Ok((image, format))
}

/// Downscale to `columns` pixels wide and pack two pixel rows per line using
/// the upper half block, foreground = top pixel, background = bottom pixel.
fn render_half_blocks(image: &DynamicImage, columns: u32) -> Vec<String> {
    let small = image.thumbnail(columns, columns).to_rgb8();
    let (w, h) = small.dimensions();

    (0..h)
        .step_by(2)
        .map(|y| {
            let mut line = String::new();
            for x in 0..w {
                let top = small.get_pixel(x, y);
                if y + 1 < h {
                    let bottom = small.get_pixel(x, y + 1);
                    line.push_str(&format!(
                        "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                        top[0], top[1], top[2], bottom[0], bottom[1], bottom[2]
                    ));
                } else {
                    line.push_str(&format!(
                        "\x1b[38;2;{};{};{}m\u{2580}",
                        top[0], top[1], top[2]
                    ));
                }
            }
            line.push_str("\x1b[0m");
            line
        })
        .collect()
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        ImageFormat::WebP => "webp".to_string(),
        ImageFormat::Gif => "gif".to_string(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgb8(width, height);
        let mut buffer = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_format_to_string() {
        assert_eq!(format_to_string(ImageFormat::Jpeg), "jpeg");
        assert_eq!(format_to_string(ImageFormat::Png), "png");
        assert_eq!(format_to_string(ImageFormat::Bmp), "unknown");
    }

    #[tokio::test]
    async fn test_decode_png_preview() {
        let upload = UploadedImage::from_bytes(png_bytes(40, 20), "image/png", "plate.png");
        let preview = ImagePreview::decode(&upload, &LimitsConfig::default(), 8)
            .await
            .unwrap();

        assert_eq!((preview.width, preview.height), (40, 20));
        assert_eq!(preview.format, "png");
        // 40x20 fits into 8x4 pixels -> two lines of half blocks
        assert_eq!(preview.lines.len(), 2);
        assert!(preview.lines.iter().all(|l| l.ends_with("\x1b[0m")));
    }

    #[tokio::test]
    async fn test_zero_columns_skips_rendering() {
        let upload = UploadedImage::from_bytes(png_bytes(4, 4), "image/png", "dot.png");
        let preview = ImagePreview::decode(&upload, &LimitsConfig::default(), 0)
            .await
            .unwrap();
        assert!(preview.lines.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_bytes_fail() {
        let upload = UploadedImage::from_bytes(vec![0x89, b'P', b'N', b'G', 0, 0], "image/png", "bad.png");
        let err = ImagePreview::decode(&upload, &LimitsConfig::default(), 8)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_dimension_limit() {
        let upload = UploadedImage::from_bytes(png_bytes(64, 8), "image/png", "wide.png");
        let limits = LimitsConfig {
            max_image_dimension: 32,
            ..LimitsConfig::default()
        };
        let err = ImagePreview::decode(&upload, &limits, 8).await.unwrap_err();
        assert!(matches!(err, AnalysisError::ImageTooLarge { width: 64, .. }));
    }

    #[test]
    fn test_caption() {
        let preview = ImagePreview {
            width: 1024,
            height: 768,
            format: "jpeg".to_string(),
            file_size: 2048,
            lines: vec![],
        };
        assert_eq!(preview.caption("lunch.jpg"), "lunch.jpg \u{b7} 1024x768 jpeg \u{b7} 2.0 KB");
    }
}
