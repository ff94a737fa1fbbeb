use serde::{Deserialize, Serialize};

use crate::global_constants;

/// Outcome of running text extraction on one image of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub source_index: usize,
    pub raw_text: Vec<String>,
    pub success: bool,
    pub failure_reason: Option<String>,
}

impl ExtractionResult {
    /// Builds a result from whatever the engine recognized. Text that is empty
    /// after trimming is reported as "no text detected", not as an error.
    pub fn from_recognized_text(source_index: usize, text: &str) -> Self {
        let trimmed = text.trim();

        if trimmed.is_empty() {
            log::debug!("[EXTRACTION] image {} produced no text", source_index);
            return Self::failed(source_index, global_constants::NO_TEXT_DETECTED);
        }

        Self {
            source_index,
            raw_text: trimmed.lines().map(|line| line.trim_end().to_string()).collect(),
            success: true,
            failure_reason: None,
        }
    }

    pub fn failed(source_index: usize, reason: impl Into<String>) -> Self {
        Self {
            source_index,
            raw_text: Vec::new(),
            success: false,
            failure_reason: Some(reason.into()),
        }
    }

    pub fn joined_text(&self) -> String {
        self.raw_text.join("\n")
    }
}
