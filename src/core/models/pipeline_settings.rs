use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::global_constants;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorStrategy {
    Local,
    Cloud,
}

impl fmt::Display for ExtractorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractorStrategy::Local => write!(f, "local"),
            ExtractorStrategy::Cloud => write!(f, "cloud"),
        }
    }
}

impl Default for ExtractorStrategy {
    fn default() -> Self {
        ExtractorStrategy::Local
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    pub extractor_strategy: ExtractorStrategy,
    pub ocr_languages: String,
    pub binarization_threshold: u8,
    pub preprocess_for_local_ocr: bool,
    pub max_lookup_line_length: usize,
    pub max_concurrent_extractions: usize,
    pub max_concurrent_lookups: usize,
    pub local_ocr_timeout_seconds: u64,
    pub remote_ocr_timeout_seconds: u64,
    pub collaborator_timeout_seconds: u64,
    pub summarization_model: String,
    pub instruction_template: String,
    pub cloud_vision_url: String,
    pub summarization_url: String,
    pub drug_registry_url: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            extractor_strategy: ExtractorStrategy::default(),
            ocr_languages: global_constants::DEFAULT_OCR_LANGUAGES.to_string(),
            binarization_threshold: global_constants::DEFAULT_BINARIZATION_THRESHOLD,
            preprocess_for_local_ocr: true,
            max_lookup_line_length: global_constants::DEFAULT_MAX_LOOKUP_LINE_LENGTH,
            max_concurrent_extractions: global_constants::DEFAULT_MAX_CONCURRENT_EXTRACTIONS,
            max_concurrent_lookups: global_constants::DEFAULT_MAX_CONCURRENT_LOOKUPS,
            local_ocr_timeout_seconds: global_constants::DEFAULT_LOCAL_OCR_TIMEOUT_SECONDS,
            remote_ocr_timeout_seconds: global_constants::DEFAULT_REMOTE_OCR_TIMEOUT_SECONDS,
            collaborator_timeout_seconds: global_constants::DEFAULT_COLLABORATOR_TIMEOUT_SECONDS,
            summarization_model: global_constants::DEFAULT_SUMMARIZATION_MODEL.to_string(),
            instruction_template: global_constants::DEFAULT_INSTRUCTION_TEMPLATE.to_string(),
            cloud_vision_url: global_constants::CLOUD_VISION_API_URL.to_string(),
            summarization_url: global_constants::OPENAI_CHAT_COMPLETIONS_URL.to_string(),
            drug_registry_url: global_constants::DRUG_REGISTRY_API_URL.to_string(),
        }
    }
}

impl PipelineSettings {
    /// Loads settings from `path`, or from the per-user config directory when no
    /// path is given. A missing file is created with defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let settings_path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::get_settings_file_path()?,
        };

        if !settings_path.exists() {
            log::info!("[SETTINGS] No settings file found, using defaults");
            let default_settings = Self::default();
            default_settings.save_to(&settings_path)?;
            return Ok(default_settings);
        }

        let contents = std::fs::read_to_string(&settings_path)?;
        let settings: PipelineSettings = serde_json::from_str(&contents)?;

        log::info!("[SETTINGS] Loaded settings from {:?}", settings_path);
        log::debug!("[SETTINGS] Extractor strategy: {}", settings.extractor_strategy);
        log::debug!("[SETTINGS] OCR languages: {}", settings.ocr_languages);

        Ok(settings)
    }

    pub fn save_to(&self, settings_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(settings_path, contents)?;

        log::info!("[SETTINGS] Saved settings to {:?}", settings_path);
        Ok(())
    }

    pub fn max_concurrent_extractions(&self) -> usize {
        self.max_concurrent_extractions.max(1)
    }

    pub fn max_concurrent_lookups(&self) -> usize {
        self.max_concurrent_lookups.max(1)
    }

    pub fn local_ocr_timeout(&self) -> Duration {
        Duration::from_secs(self.local_ocr_timeout_seconds)
    }

    pub fn remote_ocr_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_ocr_timeout_seconds)
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_seconds)
    }

    fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::APPLICATION_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}
