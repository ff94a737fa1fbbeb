use serde::Serialize;

use crate::core::models::{CandidateLookup, Corpus};

/// Everything one run produced, in the shape printed as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub image_labels: Vec<String>,
    pub corpus: Corpus,
    pub summary: Option<String>,
    pub summary_error: Option<String>,
    pub lookups: Vec<CandidateLookup>,
}
