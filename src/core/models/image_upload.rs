use std::path::Path;

use crate::core::errors::PipelineError;
use crate::core::models::{ImageMimeType, RawImage};

/// One submitted photograph, before decoding.
///
/// An upload that could not even be read still takes part in the batch so
/// that it keeps its position.
pub struct ImageUpload {
    label: String,
    mime_type: Option<ImageMimeType>,
    content: Result<Vec<u8>, String>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("label", &self.label)
            .field("mime_type", &self.mime_type)
            .field("byte_len", &self.content.as_ref().map(Vec::len).ok())
            .finish()
    }
}

impl ImageUpload {
    pub fn new(label: impl Into<String>, bytes: Vec<u8>, mime_type: Option<ImageMimeType>) -> Self {
        Self {
            label: label.into(),
            mime_type,
            content: Ok(bytes),
        }
    }

    pub async fn read_from_path(path: &Path) -> Self {
        let label = path.display().to_string();
        let mime_type = ImageMimeType::from_path(path);

        let content = match tokio::fs::read(path).await {
            Ok(bytes) => {
                log::debug!("[UPLOAD] read {} bytes from {}", bytes.len(), label);
                Ok(bytes)
            }
            Err(error) => {
                log::warn!("[UPLOAD] failed to read {}: {}", label, error);
                Err(format!("failed to read {}: {}", label, error))
            }
        };

        Self {
            label,
            mime_type,
            content,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn into_raw_image(self) -> Result<RawImage, PipelineError> {
        let bytes = self.content.map_err(PipelineError::InvalidImage)?;
        let mime_type = self.mime_type.ok_or_else(|| {
            PipelineError::invalid_image(format!(
                "{} is not a supported image type (png/jpeg)",
                self.label
            ))
        })?;

        RawImage::decode(bytes, mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_raw_image_without_mime_type_is_invalid() {
        let upload = ImageUpload::new("scan.gif", vec![1, 2, 3], None);

        let result = upload.into_raw_image();

        match result {
            Err(PipelineError::InvalidImage(reason)) => assert!(reason.contains("scan.gif")),
            other => panic!("expected invalid image, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_read_from_missing_path_yields_invalid_image_on_decode() {
        let path = std::env::temp_dir().join(format!("missing-{}.png", uuid::Uuid::new_v4()));

        let upload = ImageUpload::read_from_path(&path).await;

        assert_eq!(upload.label(), path.display().to_string());
        assert!(matches!(
            upload.into_raw_image(),
            Err(PipelineError::InvalidImage(_))
        ));
    }
}
