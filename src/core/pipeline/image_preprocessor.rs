use image::{DynamicImage, GrayImage, Luma};

use crate::core::errors::PipelineError;
use crate::core::models::{ensure_non_empty_dimensions, ProcessedImage, RawImage};
use crate::global_constants;

/// Grayscale conversion followed by fixed-threshold binarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePreprocessor {
    threshold: u8,
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::with_threshold(global_constants::DEFAULT_BINARIZATION_THRESHOLD)
    }
}

impl ImagePreprocessor {
    pub fn with_threshold(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn preprocess(&self, image: &RawImage) -> Result<ProcessedImage, PipelineError> {
        self.preprocess_bitmap(image.bitmap())
    }

    pub fn preprocess_bitmap(&self, bitmap: &DynamicImage) -> Result<ProcessedImage, PipelineError> {
        ensure_non_empty_dimensions(bitmap.width(), bitmap.height())?;

        log::debug!(
            "[PREPROCESS] binarizing {}x{} image at threshold {}",
            bitmap.width(),
            bitmap.height(),
            self.threshold
        );

        let grayscale = bitmap.to_luma8();
        Ok(ProcessedImage::from_binarized(self.binarize(&grayscale)))
    }

    fn binarize(&self, grayscale: &GrayImage) -> GrayImage {
        let threshold = self.threshold;
        GrayImage::from_fn(grayscale.width(), grayscale.height(), |x, y| {
            let Luma([intensity]) = *grayscale.get_pixel(x, y);
            if intensity >= threshold {
                Luma([global_constants::BINARIZED_LIGHT_VALUE])
            } else {
                Luma([global_constants::BINARIZED_DARK_VALUE])
            }
        })
    }
}
