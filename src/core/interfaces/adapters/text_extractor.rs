use async_trait::async_trait;

use crate::core::errors::PipelineError;
use crate::core::models::{ExtractionResult, ProcessedImage, RawImage};

#[derive(Debug, Clone, Copy)]
pub enum ExtractorInput<'a> {
    Raw(&'a RawImage),
    Processed(&'a ProcessedImage),
}

impl ExtractorInput<'_> {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ExtractorInput::Raw(image) => (image.width(), image.height()),
            ExtractorInput::Processed(image) => (image.width(), image.height()),
        }
    }
}

/// Turns one image into text. Implementations own their timeout policy and
/// report timeouts, transport failures and missing engines as
/// `PipelineError::Extraction`. Recognizing nothing is not an error.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the extractor benefits from a binarized image.
    fn accepts_preprocessed(&self) -> bool;

    async fn extract(
        &self,
        source_index: usize,
        image: ExtractorInput<'_>,
    ) -> Result<ExtractionResult, PipelineError>;
}
