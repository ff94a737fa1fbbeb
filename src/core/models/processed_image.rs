use image::{DynamicImage, GrayImage};

/// Single-channel, two-level bitmap ready for a local OCR engine.
#[derive(Clone, PartialEq)]
pub struct ProcessedImage {
    pixels: GrayImage,
}

impl std::fmt::Debug for ProcessedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessedImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl ProcessedImage {
    pub(crate) fn from_binarized(pixels: GrayImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[cfg(test)]
    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    pub fn to_dynamic_image(&self) -> DynamicImage {
        DynamicImage::ImageLuma8(self.pixels.clone())
    }
}
