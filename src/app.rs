use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use futures::stream::{self, StreamExt};

use crate::adapters::{
    CloudVisionTextExtractor, DrugRegistryClient, OpenAiInteractionSummarizer,
    TesseractTextExtractor,
};
use crate::cli::RunOptions;
use crate::core::interfaces::adapters::{DrugRegistry, InteractionSummarizer, TextExtractor};
use crate::core::models::{
    BatchReport, CandidateLookup, Corpus, Credentials, ExtractorStrategy, ImageUpload,
    LookupOutcome, PipelineSettings,
};
use crate::core::orchestrators::{BatchOrchestrator, CancellationToken};

pub struct MedLabelApp {
    orchestrator: BatchOrchestrator,
    summarizer: Option<Arc<dyn InteractionSummarizer>>,
    registry: Option<Arc<dyn DrugRegistry>>,
    max_concurrent_lookups: usize,
}

impl MedLabelApp {
    pub fn build(
        settings: PipelineSettings,
        credentials: Credentials,
        options: RunOptions,
    ) -> Result<Self> {
        log::info!("[APP] Initializing application");

        let extractor = Self::build_extractor(&settings, &credentials)?;

        let summarizer: Option<Arc<dyn InteractionSummarizer>> =
            match (&credentials.summarization, options.skip_summary) {
                (Some(api_key), false) => Some(Arc::new(OpenAiInteractionSummarizer::build(
                    api_key.clone(),
                    settings.summarization_url.clone(),
                    settings.summarization_model.clone(),
                    settings.instruction_template.clone(),
                    settings.collaborator_timeout(),
                )?)),
                (None, false) => {
                    log::info!("[APP] No summarization credential, summary disabled");
                    None
                }
                (_, true) => None,
            };

        let registry: Option<Arc<dyn DrugRegistry>> =
            match (&credentials.registry, options.skip_lookup) {
                (Some(service_key), false) => Some(Arc::new(DrugRegistryClient::build(
                    service_key.clone(),
                    settings.drug_registry_url.clone(),
                    settings.collaborator_timeout(),
                )?)),
                (None, false) => {
                    log::info!("[APP] No registry credential, lookups disabled");
                    None
                }
                (_, true) => None,
            };

        Ok(Self::from_parts(extractor, summarizer, registry, &settings))
    }

    pub fn from_parts(
        extractor: Arc<dyn TextExtractor>,
        summarizer: Option<Arc<dyn InteractionSummarizer>>,
        registry: Option<Arc<dyn DrugRegistry>>,
        settings: &PipelineSettings,
    ) -> Self {
        Self {
            orchestrator: BatchOrchestrator::build(extractor, settings),
            summarizer,
            registry,
            max_concurrent_lookups: settings.max_concurrent_lookups(),
        }
    }

    fn build_extractor(
        settings: &PipelineSettings,
        credentials: &Credentials,
    ) -> Result<Arc<dyn TextExtractor>> {
        match settings.extractor_strategy {
            ExtractorStrategy::Local => Ok(Arc::new(TesseractTextExtractor::build(
                settings.ocr_languages.clone(),
                settings.local_ocr_timeout(),
            ))),
            ExtractorStrategy::Cloud => {
                let api_key = credentials.vision.clone().ok_or_else(|| {
                    anyhow::anyhow!("The cloud strategy needs a vision API key (--vision-api-key)")
                })?;
                Ok(Arc::new(CloudVisionTextExtractor::build(
                    api_key,
                    settings.cloud_vision_url.clone(),
                    settings.remote_ocr_timeout(),
                )?))
            }
        }
    }

    pub async fn run(&self, image_paths: &[PathBuf], cancellation: &CancellationToken) -> BatchReport {
        let mut uploads = Vec::with_capacity(image_paths.len());
        for path in image_paths {
            uploads.push(ImageUpload::read_from_path(path).await);
        }
        self.run_uploads(uploads, cancellation).await
    }

    pub async fn run_uploads(
        &self,
        uploads: Vec<ImageUpload>,
        cancellation: &CancellationToken,
    ) -> BatchReport {
        let image_labels: Vec<String> =
            uploads.iter().map(|upload| upload.label().to_string()).collect();
        let corpus = self.orchestrator.process_batch(uploads, cancellation).await;

        let (summary, summary_error) = if cancellation.is_cancelled() {
            (None, None)
        } else {
            self.summarize(&corpus).await
        };

        let lookups = if cancellation.is_cancelled() {
            Vec::new()
        } else {
            self.lookup_candidates(&corpus).await
        };

        BatchReport {
            image_labels,
            corpus,
            summary,
            summary_error,
            lookups,
        }
    }

    async fn summarize(&self, corpus: &Corpus) -> (Option<String>, Option<String>) {
        let Some(summarizer) = &self.summarizer else {
            return (None, None);
        };

        if !corpus.has_text() {
            log::warn!("[APP] No text extracted, skipping interaction summary");
            return (None, None);
        }

        match summarizer.summarize(&corpus.combined_text).await {
            Ok(summary) => (Some(summary), None),
            Err(error) => {
                log::error!("[APP] Interaction summary failed: {:#}", error);
                (None, Some(format!("{:#}", error)))
            }
        }
    }

    async fn lookup_candidates(&self, corpus: &Corpus) -> Vec<CandidateLookup> {
        let Some(registry) = &self.registry else {
            return Vec::new();
        };

        let candidates = corpus.lookup_candidates();
        log::info!("[APP] Looking up {} candidates in the registry", candidates.len());

        stream::iter(candidates)
            .map(|candidate| {
                let registry = Arc::clone(registry);
                async move {
                    let outcome = match registry.lookup(candidate).await {
                        Ok(Some(record)) => LookupOutcome::Found { record },
                        Ok(None) => LookupOutcome::NotFound,
                        Err(error) => {
                            log::warn!("[APP] Lookup for '{}' failed: {:#}", candidate, error);
                            LookupOutcome::Failed {
                                reason: format!("{:#}", error),
                            }
                        }
                    };
                    CandidateLookup {
                        candidate: candidate.to_string(),
                        outcome,
                    }
                }
            })
            .buffered(self.max_concurrent_lookups)
            .collect()
            .await
    }
}

pub fn render_text_report(report: &BatchReport) -> String {
    TextReport(report).to_string()
}

/// Plain-text rendering of a batch report for terminal output.
struct TextReport<'a>(&'a BatchReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let corpus = &report.corpus;

        writeln!(f, "== Extracted label text ==")?;
        if corpus.has_text() {
            writeln!(f, "{}", corpus.combined_text)?;
        } else {
            writeln!(f, "(no text extracted)")?;
        }

        for (index, reason) in corpus.failures() {
            let label = report
                .image_labels
                .get(index)
                .map(String::as_str)
                .unwrap_or("?");
            writeln!(f, "[WARNING] image {} ({}): {}", index, label, reason)?;
        }

        if !corpus.token_index.is_empty() {
            writeln!(f)?;
            writeln!(f, "== Candidate medications ==")?;
            for (token, sources) in corpus.token_provenance() {
                let sources: Vec<String> = sources.iter().map(usize::to_string).collect();
                writeln!(f, "{} (images {})", token, sources.join(", "))?;
            }
        }

        if let Some(summary) = &report.summary {
            writeln!(f)?;
            writeln!(f, "== Interaction summary ==")?;
            writeln!(f, "{}", summary)?;
        }
        if let Some(error) = &report.summary_error {
            writeln!(f)?;
            writeln!(f, "[WARNING] interaction summary unavailable: {}", error)?;
        }

        if !report.lookups.is_empty() {
            writeln!(f)?;
            writeln!(f, "== Registry lookups ==")?;
            for lookup in &report.lookups {
                match &lookup.outcome {
                    LookupOutcome::Found { record } => {
                        writeln!(f, "{} -> {}", lookup.candidate, record.item_name)?;
                        writeln!(f, "  efficacy: {}", record.efficacy)?;
                        writeln!(f, "  usage: {}", record.usage_method)?;
                    }
                    LookupOutcome::NotFound => {
                        writeln!(f, "{} -> not found", lookup.candidate)?;
                    }
                    LookupOutcome::Failed { reason } => {
                        writeln!(f, "{} -> lookup failed: {}", lookup.candidate, reason)?;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::PipelineError;
    use crate::core::interfaces::adapters::ExtractorInput;
    use crate::core::models::{DrugRecord, ExtractionResult, ImageMimeType, Secret};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedExtractor {
        texts: Vec<&'static str>,
    }

    #[async_trait]
    impl TextExtractor for ScriptedExtractor {
        fn name(&self) -> &str {
            "scripted"
        }

        fn accepts_preprocessed(&self) -> bool {
            false
        }

        async fn extract(
            &self,
            source_index: usize,
            _image: ExtractorInput<'_>,
        ) -> Result<ExtractionResult, PipelineError> {
            Ok(ExtractionResult::from_recognized_text(
                source_index,
                self.texts[source_index],
            ))
        }
    }

    struct RecordingSummarizer {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl InteractionSummarizer for RecordingSummarizer {
        async fn summarize(&self, combined_text: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(combined_text.to_string());
            Ok("Do not combine.".to_string())
        }
    }

    struct FailingSummarizer;

    #[async_trait]
    impl InteractionSummarizer for FailingSummarizer {
        async fn summarize(&self, _combined_text: &str) -> Result<String> {
            anyhow::bail!("service unavailable")
        }
    }

    struct MockRegistry;

    #[async_trait]
    impl DrugRegistry for MockRegistry {
        async fn lookup(&self, candidate: &str) -> Result<Option<DrugRecord>> {
            match candidate {
                "Aspirin" => Ok(Some(DrugRecord {
                    item_name: "Aspirin Protect".to_string(),
                    efficacy: "pain relief".to_string(),
                    usage_method: "once daily".to_string(),
                })),
                "Broken" => anyhow::bail!("registry timeout"),
                _ => Ok(None),
            }
        }
    }

    fn png_upload(label: &str) -> ImageUpload {
        let bitmap = image::DynamicImage::ImageLuma8(image::GrayImage::new(4, 4));
        let raw = crate::core::models::RawImage::from_bitmap(bitmap).unwrap();
        ImageUpload::new(label, raw.encoded_bytes().to_vec(), Some(ImageMimeType::Png))
    }

    #[tokio::test]
    async fn test_run_sends_combined_text_to_summarizer_once() {
        let summarizer = Arc::new(RecordingSummarizer {
            prompts: Mutex::new(Vec::new()),
        });
        let app = MedLabelApp::from_parts(
            Arc::new(ScriptedExtractor {
                texts: vec!["Tylenol 500mg\nTake twice daily", "Aspirin\nTake once daily"],
            }),
            Some(summarizer.clone()),
            None,
            &PipelineSettings::default(),
        );

        let report = app
            .run_uploads(vec![png_upload("a.png"), png_upload("b.png")], &CancellationToken::never())
            .await;

        assert_eq!(report.summary.as_deref(), Some("Do not combine."));
        assert_eq!(
            *summarizer.prompts.lock().unwrap(),
            vec!["Tylenol 500mg\nTake twice daily\n\nAspirin\nTake once daily".to_string()]
        );
    }

    #[tokio::test]
    async fn test_summarizer_failure_is_reported_not_fatal() {
        let app = MedLabelApp::from_parts(
            Arc::new(ScriptedExtractor { texts: vec!["Aspirin"] }),
            Some(Arc::new(FailingSummarizer)),
            None,
            &PipelineSettings::default(),
        );

        let report = app
            .run_uploads(vec![png_upload("a.png")], &CancellationToken::never())
            .await;

        assert!(report.summary.is_none());
        assert!(report.summary_error.unwrap().contains("service unavailable"));
        assert_eq!(report.corpus.combined_text, "Aspirin");
    }

    #[tokio::test]
    async fn test_lookups_fan_out_over_short_lines_and_record_each_outcome() {
        let app = MedLabelApp::from_parts(
            Arc::new(ScriptedExtractor {
                texts: vec!["Aspirin\nBroken", "Unknown pill"],
            }),
            None,
            Some(Arc::new(MockRegistry)),
            &PipelineSettings::default(),
        );

        let report = app
            .run_uploads(vec![png_upload("a.png"), png_upload("b.png")], &CancellationToken::never())
            .await;

        let outcomes: Vec<(&str, &LookupOutcome)> = report
            .lookups
            .iter()
            .map(|lookup| (lookup.candidate.as_str(), &lookup.outcome))
            .collect();
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], ("Aspirin", LookupOutcome::Found { .. })));
        assert!(matches!(outcomes[1], ("Broken", LookupOutcome::Failed { .. })));
        assert!(matches!(outcomes[2], ("Unknown pill", LookupOutcome::NotFound)));
    }

    #[tokio::test]
    async fn test_empty_batch_skips_summary() {
        let summarizer = Arc::new(RecordingSummarizer {
            prompts: Mutex::new(Vec::new()),
        });
        let app = MedLabelApp::from_parts(
            Arc::new(ScriptedExtractor { texts: vec![] }),
            Some(summarizer.clone()),
            None,
            &PipelineSettings::default(),
        );

        let report = app.run_uploads(Vec::new(), &CancellationToken::never()).await;

        assert!(report.corpus.ordered_texts.is_empty());
        assert!(report.summary.is_none());
        assert!(summarizer.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cloud_strategy_without_credential_fails_to_build() {
        let settings = PipelineSettings {
            extractor_strategy: ExtractorStrategy::Cloud,
            ..PipelineSettings::default()
        };

        let result = MedLabelApp::build(settings, Credentials::default(), RunOptions::default());

        assert!(result.is_err());
    }

    #[test]
    fn test_cloud_strategy_with_credential_builds() {
        let settings = PipelineSettings {
            extractor_strategy: ExtractorStrategy::Cloud,
            ..PipelineSettings::default()
        };
        let credentials = Credentials {
            vision: Secret::new("vision-key"),
            ..Credentials::default()
        };

        assert!(MedLabelApp::build(settings, credentials, RunOptions::default()).is_ok());
    }

    #[test]
    fn test_render_text_report_lists_text_warnings_and_tokens() {
        let corpus = crate::core::pipeline::CorpusAggregator::default().aggregate(vec![
            ExtractionResult::from_recognized_text(0, "Tylenol 500mg"),
            ExtractionResult::failed(1, "engine unavailable"),
        ]);
        let report = BatchReport {
            image_labels: vec!["front.png".to_string(), "back.png".to_string()],
            corpus,
            summary: Some("Fine together.".to_string()),
            summary_error: None,
            lookups: vec![CandidateLookup {
                candidate: "Tylenol 500mg".to_string(),
                outcome: LookupOutcome::NotFound,
            }],
        };

        let rendered = render_text_report(&report);

        assert!(rendered.contains("Tylenol 500mg\n"));
        assert!(rendered.contains("[WARNING] image 1 (back.png): engine unavailable"));
        assert!(rendered.contains("Tylenol (images 0)"));
        assert!(rendered.contains("Fine together."));
        assert!(rendered.contains("Tylenol 500mg -> not found"));
    }

    #[test]
    fn test_render_text_report_covers_failed_summary_and_every_lookup_outcome() {
        let corpus = crate::core::pipeline::CorpusAggregator::default()
            .aggregate(vec![ExtractionResult::failed(0, "no text detected")]);
        let report = BatchReport {
            image_labels: vec!["blurry.jpg".to_string()],
            corpus,
            summary: None,
            summary_error: Some("HTTP 429".to_string()),
            lookups: vec![
                CandidateLookup {
                    candidate: "Aspirin".to_string(),
                    outcome: LookupOutcome::Found {
                        record: DrugRecord {
                            item_name: "아스피린정".to_string(),
                            efficacy: "해열".to_string(),
                            usage_method: "1일 1회".to_string(),
                        },
                    },
                },
                CandidateLookup {
                    candidate: "Unknownol".to_string(),
                    outcome: LookupOutcome::Failed {
                        reason: "timeout".to_string(),
                    },
                },
            ],
        };

        let rendered = render_text_report(&report);

        assert_eq!(
            rendered,
            "== Extracted label text ==\n\
             (no text extracted)\n\
             [WARNING] image 0 (blurry.jpg): no text detected\n\
             \n\
             [WARNING] interaction summary unavailable: HTTP 429\n\
             \n\
             == Registry lookups ==\n\
             Aspirin -> 아스피린정\n  efficacy: 해열\n  usage: 1일 1회\n\
             Unknownol -> lookup failed: timeout\n"
        );
    }
}
