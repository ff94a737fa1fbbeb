use thiserror::Error;

/// Failures that are local to a single image of a batch.
///
/// The orchestrator never lets one of these abort the batch; it turns them
/// into a failed `ExtractionResult` occupying the image's slot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("extraction failed: {0}")]
    Extraction(String),
}

impl PipelineError {
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage(reason.into())
    }

    pub fn extraction(reason: impl Into<String>) -> Self {
        Self::Extraction(reason.into())
    }
}
