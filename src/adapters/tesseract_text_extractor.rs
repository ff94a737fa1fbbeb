use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use image::DynamicImage;
use rusty_tesseract::{Args, Image as TesseractImage};

use crate::core::errors::PipelineError;
use crate::core::interfaces::adapters::{ExtractorInput, TextExtractor};
use crate::core::models::ExtractionResult;

/// Local OCR through the Tesseract engine, with several language models
/// loaded at once since labels mix scripts.
pub struct TesseractTextExtractor {
    languages: String,
    timeout: Duration,
}

impl TesseractTextExtractor {
    pub fn build(languages: impl Into<String>, timeout: Duration) -> Self {
        let languages = languages.into();
        log::info!(
            "[TESSERACT] Initializing Tesseract extractor with languages '{}'",
            languages
        );
        Self { languages, timeout }
    }

    fn write_scratch_png(image: &DynamicImage) -> Result<PathBuf, PipelineError> {
        let scratch_path =
            std::env::temp_dir().join(format!("med-label-reader-{}.png", uuid::Uuid::new_v4()));

        log::debug!("[TESSERACT] Writing scratch image to {:?}", scratch_path);
        image
            .save_with_format(&scratch_path, image::ImageFormat::Png)
            .map_err(|e| {
                PipelineError::extraction(format!("failed to prepare image for tesseract: {}", e))
            })?;

        Ok(scratch_path)
    }

    fn run_engine(scratch_path: &Path, languages: &str) -> Result<String, PipelineError> {
        let tesseract_image = TesseractImage::from_path(scratch_path).map_err(|e| {
            PipelineError::extraction(format!("failed to load image into tesseract: {}", e))
        })?;

        let args = Args {
            lang: languages.to_string(),
            ..Args::default()
        };

        rusty_tesseract::image_to_string(&tesseract_image, &args)
            .map_err(|e| PipelineError::extraction(format!("tesseract engine unavailable: {}", e)))
    }

    fn recognize_blocking(image: DynamicImage, languages: String) -> Result<String, PipelineError> {
        let scratch_path = Self::write_scratch_png(&image)?;
        let recognized = Self::run_engine(&scratch_path, &languages);

        if let Err(error) = std::fs::remove_file(&scratch_path) {
            log::warn!("[TESSERACT] Failed to remove scratch image: {}", error);
        }

        recognized
    }
}

#[async_trait]
impl TextExtractor for TesseractTextExtractor {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn accepts_preprocessed(&self) -> bool {
        true
    }

    async fn extract(
        &self,
        source_index: usize,
        image: ExtractorInput<'_>,
    ) -> Result<ExtractionResult, PipelineError> {
        let (width, height) = image.dimensions();
        log::info!("[TESSERACT] Starting text extraction for image {}", source_index);
        log::debug!("[TESSERACT] Image dimensions: {}x{}", width, height);

        let bitmap = match image {
            ExtractorInput::Raw(raw) => raw.bitmap().clone(),
            ExtractorInput::Processed(processed) => processed.to_dynamic_image(),
        };
        let languages = self.languages.clone();

        let extracted_text = run_with_deadline(self.timeout, move || {
            Self::recognize_blocking(bitmap, languages)
        })
        .await?;

        log::info!(
            "[TESSERACT] Text extraction complete. Extracted {} characters",
            extracted_text.len()
        );
        log::debug!("[TESSERACT] Extracted text: {}", extracted_text);

        Ok(ExtractionResult::from_recognized_text(
            source_index,
            &extracted_text,
        ))
    }
}

/// Runs blocking engine work on the blocking pool. A worker that panics or
/// outlives `timeout` becomes an extraction failure for that image only.
async fn run_with_deadline<F>(timeout: Duration, work: F) -> Result<String, PipelineError>
where
    F: FnOnce() -> Result<String, PipelineError> + Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(work)).await {
        Ok(Ok(recognized)) => recognized,
        Ok(Err(join_error)) => Err(PipelineError::extraction(format!(
            "tesseract worker failed: {}",
            join_error
        ))),
        Err(_) => Err(PipelineError::extraction(format!(
            "tesseract timed out after {}ms",
            timeout.as_millis()
        ))),
    }
}
