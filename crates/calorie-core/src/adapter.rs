//! Converts an upload into the parts list a multimodal request carries.

use base64::Engine;

use crate::upload::UploadedImage;

/// One image part of a multimodal request.
///
/// `data` is the upload's bytes, untouched. Providers encode it for their own
/// wire format at send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub mime_type: String,
    /// Raw image bytes
    pub data: Vec<u8>,
}

impl ImagePart {
    /// Base64 text of the image bytes.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// Prepare an optional upload for the analysis call.
///
/// Returns `None` when nothing was uploaded, otherwise a single-element list
/// reproducing the upload's media type and bytes.
pub fn prepare_image(upload: Option<&UploadedImage>) -> Option<Vec<ImagePart>> {
    let upload = upload?;
    Some(vec![ImagePart {
        mime_type: upload.media_type().to_string(),
        data: upload.bytes().to_vec(),
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_upload_yields_none() {
        assert_eq!(prepare_image(None), None);
    }

    #[test]
    fn test_present_upload_yields_single_identical_part() {
        let bytes: Vec<u8> = (0u8..10).collect();
        let upload = UploadedImage::from_bytes(bytes.clone(), "image/png", "plate.png");

        let parts = prepare_image(Some(&upload)).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].mime_type, "image/png");
        assert_eq!(parts[0].data, bytes);
    }

    #[test]
    fn test_adaptation_is_deterministic() {
        let upload = UploadedImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xDB], "image/jpeg", "a.jpg");
        assert_eq!(prepare_image(Some(&upload)), prepare_image(Some(&upload)));
    }

    #[test]
    fn test_data_url() {
        let part = ImagePart {
            mime_type: "image/jpeg".to_string(),
            data: vec![1, 2, 3],
        };
        assert_eq!(part.to_base64(), "AQID");
        assert_eq!(part.data_url(), "data:image/jpeg;base64,AQID");
    }
}
