use std::io::Cursor;

use image::DynamicImage;

use crate::core::errors::PipelineError;
use crate::core::models::ImageMimeType;

/// A decoded photograph together with the bytes it was decoded from.
///
/// Remote extractors need the original encoded bytes while local ones work on
/// the bitmap, so both are kept. Nothing hands out mutable access.
#[derive(Clone)]
pub struct RawImage {
    mime_type: ImageMimeType,
    encoded_bytes: Vec<u8>,
    bitmap: DynamicImage,
}

impl std::fmt::Debug for RawImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawImage")
            .field("mime_type", &self.mime_type)
            .field("width", &self.width())
            .field("height", &self.height())
            .field("encoded_len", &self.encoded_bytes.len())
            .finish()
    }
}

impl RawImage {
    /// Decodes by sniffing the content. The declared type only matters when
    /// the bytes carry no recognizable PNG or JPEG signature.
    pub fn decode(encoded_bytes: Vec<u8>, declared: ImageMimeType) -> Result<Self, PipelineError> {
        if encoded_bytes.is_empty() {
            return Err(PipelineError::invalid_image("image buffer is empty"));
        }

        let mime_type = match image::guess_format(&encoded_bytes)
            .ok()
            .and_then(ImageMimeType::from_image_format)
        {
            Some(detected) => {
                if detected != declared {
                    log::debug!(
                        "[RAW_IMAGE] declared {} but content is {}, decoding as {}",
                        declared,
                        detected,
                        detected
                    );
                }
                detected
            }
            None => declared,
        };

        let bitmap = image::load_from_memory_with_format(&encoded_bytes, mime_type.as_image_format())
            .map_err(|e| {
                PipelineError::invalid_image(format!("failed to decode {} data: {}", mime_type, e))
            })?;

        ensure_non_empty_dimensions(bitmap.width(), bitmap.height())?;

        let image = Self {
            mime_type,
            encoded_bytes,
            bitmap,
        };

        log::debug!(
            "[RAW_IMAGE] decoded {} image: {}x{}, {} channels",
            image.mime_type,
            image.width(),
            image.height(),
            image.channel_count()
        );

        Ok(image)
    }

    /// Wraps an in-memory bitmap, encoding it as PNG so remote extractors can
    /// still receive bytes.
    #[cfg(test)]
    pub fn from_bitmap(bitmap: DynamicImage) -> Result<Self, PipelineError> {
        ensure_non_empty_dimensions(bitmap.width(), bitmap.height())?;

        let mut encoded_bytes = Vec::new();
        bitmap
            .write_to(&mut Cursor::new(&mut encoded_bytes), image::ImageFormat::Png)
            .map_err(|e| PipelineError::invalid_image(format!("failed to encode bitmap: {}", e)))?;

        Ok(Self {
            mime_type: ImageMimeType::Png,
            encoded_bytes,
            bitmap,
        })
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    pub fn channel_count(&self) -> u8 {
        self.bitmap.color().channel_count()
    }

    pub fn mime_type(&self) -> ImageMimeType {
        self.mime_type
    }

    pub fn encoded_bytes(&self) -> &[u8] {
        &self.encoded_bytes
    }

    pub fn bitmap(&self) -> &DynamicImage {
        &self.bitmap
    }
}

pub(crate) fn ensure_non_empty_dimensions(width: u32, height: u32) -> Result<(), PipelineError> {
    if width == 0 || height == 0 {
        return Err(PipelineError::invalid_image(format!(
            "image has zero-sized dimensions ({}x{})",
            width, height
        )));
    }
    Ok(())
}
