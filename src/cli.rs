use std::path::PathBuf;

use clap::Parser;

use crate::core::models::{Credentials, ExtractorStrategy, PipelineSettings};
use crate::global_constants;

#[derive(Parser, Debug)]
#[command(
    name = "med-label-reader",
    version,
    about = "Reads medication packaging photos and checks the medications for interaction risks"
)]
pub struct Cli {
    /// Photos of medication packaging (png/jpeg), in upload order.
    pub images: Vec<PathBuf>,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub strategy: Option<ExtractorStrategy>,

    /// Tesseract language set, e.g. "eng+kor".
    #[arg(long)]
    pub lang: Option<String>,

    #[arg(long)]
    pub threshold: Option<u8>,

    #[arg(long, default_value_t = false)]
    pub no_preprocess: bool,

    #[arg(long)]
    pub max_line_length: Option<usize>,

    #[arg(long)]
    pub concurrency: Option<usize>,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub skip_summary: bool,

    #[arg(long, default_value_t = false)]
    pub skip_lookup: bool,

    #[arg(long, env = global_constants::ENV_VISION_API_KEY, hide_env_values = true)]
    pub vision_api_key: Option<String>,

    #[arg(long, env = global_constants::ENV_OPENAI_API_KEY, hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = global_constants::ENV_REGISTRY_API_KEY, hide_env_values = true)]
    pub registry_api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub skip_summary: bool,
    pub skip_lookup: bool,
}

impl Cli {
    pub fn apply_overrides(&self, settings: &mut PipelineSettings) {
        if let Some(strategy) = self.strategy {
            settings.extractor_strategy = strategy;
        }
        if let Some(lang) = &self.lang {
            settings.ocr_languages = lang.clone();
        }
        if let Some(threshold) = self.threshold {
            settings.binarization_threshold = threshold;
        }
        if self.no_preprocess {
            settings.preprocess_for_local_ocr = false;
        }
        if let Some(max_line_length) = self.max_line_length {
            settings.max_lookup_line_length = max_line_length;
        }
        if let Some(concurrency) = self.concurrency {
            settings.max_concurrent_extractions = concurrency;
        }
    }

    /// Moves the secrets out so they do not linger in the parsed arguments.
    pub fn take_credentials(&mut self) -> Credentials {
        Credentials::from_values(
            self.vision_api_key.take(),
            self.openai_api_key.take(),
            self.registry_api_key.take(),
        )
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            skip_summary: self.skip_summary,
            skip_lookup: self.skip_lookup,
        }
    }
}
