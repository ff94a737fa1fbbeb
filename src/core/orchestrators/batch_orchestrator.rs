use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::core::errors::PipelineError;
use crate::core::interfaces::adapters::{ExtractorInput, TextExtractor};
use crate::core::models::{
    Corpus, ExtractionResult, ImageUpload, PipelineSettings, ProcessedImage, RawImage,
};
use crate::core::orchestrators::CancellationToken;
use crate::core::pipeline::{CorpusAggregator, ImagePreprocessor};
use crate::global_constants;

/// Runs one uploaded batch through decode, preprocessing, extraction and
/// aggregation. A failure of any single image stays in that image's slot.
pub struct BatchOrchestrator {
    extractor: Arc<dyn TextExtractor>,
    preprocessor: ImagePreprocessor,
    aggregator: CorpusAggregator,
    preprocess_enabled: bool,
    max_concurrent_extractions: usize,
}

impl BatchOrchestrator {
    pub fn build(extractor: Arc<dyn TextExtractor>, settings: &PipelineSettings) -> Self {
        log::info!(
            "[ORCHESTRATOR] using {} extractor, up to {} concurrent extractions",
            extractor.name(),
            settings.max_concurrent_extractions()
        );

        Self {
            extractor,
            preprocessor: ImagePreprocessor::with_threshold(settings.binarization_threshold),
            aggregator: CorpusAggregator::new(settings.max_lookup_line_length),
            preprocess_enabled: settings.preprocess_for_local_ocr,
            max_concurrent_extractions: settings.max_concurrent_extractions(),
        }
    }

    pub async fn process_batch(
        &self,
        uploads: Vec<ImageUpload>,
        cancellation: &CancellationToken,
    ) -> Corpus {
        log::info!("[ORCHESTRATOR] processing batch of {} images", uploads.len());

        let results: Vec<ExtractionResult> = stream::iter(uploads.into_iter().enumerate())
            .map(|(index, upload)| self.process_image(index, upload, cancellation.clone()))
            .buffer_unordered(self.max_concurrent_extractions)
            .collect()
            .await;

        self.aggregator.aggregate(results)
    }

    async fn process_image(
        &self,
        index: usize,
        upload: ImageUpload,
        cancellation: CancellationToken,
    ) -> ExtractionResult {
        if cancellation.is_cancelled() {
            log::warn!("[ORCHESTRATOR] image {} skipped: batch cancelled", index);
            return ExtractionResult::failed(index, global_constants::EXTRACTION_CANCELLED);
        }

        let label = upload.label().to_string();
        log::debug!("[ORCHESTRATOR] image {} ({}) started", index, label);

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                log::warn!("[ORCHESTRATOR] image {} ({}) cancelled in flight", index, label);
                ExtractionResult::failed(index, global_constants::EXTRACTION_CANCELLED)
            }
            outcome = self.decode_and_extract(index, upload) => match outcome {
                Ok(mut result) => {
                    result.source_index = index;
                    if let Some(reason) = &result.failure_reason {
                        log::warn!("[ORCHESTRATOR] image {} ({}): {}", index, label, reason);
                    } else {
                        log::info!(
                            "[ORCHESTRATOR] image {} ({}) extracted {} lines",
                            index,
                            label,
                            result.raw_text.len()
                        );
                    }
                    result
                }
                Err(error) => {
                    log::warn!("[ORCHESTRATOR] image {} ({}) failed: {}", index, label, error);
                    ExtractionResult::failed(index, error.to_string())
                }
            }
        }
    }

    async fn decode_and_extract(
        &self,
        index: usize,
        upload: ImageUpload,
    ) -> Result<ExtractionResult, PipelineError> {
        let preprocessor = (self.preprocess_enabled && self.extractor.accepts_preprocessed())
            .then_some(self.preprocessor);

        let prepared = tokio::task::spawn_blocking(move || prepare_image(upload, preprocessor))
            .await
            .map_err(|e| PipelineError::invalid_image(format!("image decode worker failed: {}", e)))??;

        self.extractor.extract(index, prepared.as_input()).await
    }
}

/// Decoded image in the form the extractor will receive.
enum PreparedImage {
    Raw(RawImage),
    Processed(ProcessedImage),
}

impl PreparedImage {
    fn as_input(&self) -> ExtractorInput<'_> {
        match self {
            Self::Raw(raw) => ExtractorInput::Raw(raw),
            Self::Processed(processed) => ExtractorInput::Processed(processed),
        }
    }
}

/// CPU-bound half of a single image: decode, then binarize when a
/// preprocessor is given. Runs on the blocking pool.
fn prepare_image(
    upload: ImageUpload,
    preprocessor: Option<ImagePreprocessor>,
) -> Result<PreparedImage, PipelineError> {
    let raw_image = upload.into_raw_image()?;

    match preprocessor {
        Some(preprocessor) => {
            log::debug!(
                "[ORCHESTRATOR] binarizing {}x{} image at threshold {}",
                raw_image.width(),
                raw_image.height(),
                preprocessor.threshold()
            );
            Ok(PreparedImage::Processed(preprocessor.preprocess(&raw_image)?))
        }
        None => Ok(PreparedImage::Raw(raw_image)),
    }
}
