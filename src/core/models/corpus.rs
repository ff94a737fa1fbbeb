use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::core::models::{ExtractionResult, TokenIndex};

/// Consolidated output of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Corpus {
    pub ordered_texts: Vec<ExtractionResult>,
    pub combined_text: String,
    pub token_index: TokenIndex,
    pub lookup_index: TokenIndex,
}

impl Corpus {
    pub fn token_set(&self) -> BTreeSet<&str> {
        self.token_index.token_set()
    }

    pub fn token_provenance(&self) -> &BTreeMap<String, BTreeSet<usize>> {
        self.token_index.provenance()
    }

    /// Short-line candidates meant for registry lookups, de-duplicated.
    pub fn lookup_candidates(&self) -> Vec<&str> {
        self.lookup_index.tokens().collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &str)> {
        self.ordered_texts
            .iter()
            .filter(|result| !result.success)
            .map(|result| {
                (
                    result.source_index,
                    result.failure_reason.as_deref().unwrap_or("unknown failure"),
                )
            })
    }

    pub fn successful_count(&self) -> usize {
        self.ordered_texts.iter().filter(|result| result.success).count()
    }

    pub fn has_text(&self) -> bool {
        !self.combined_text.is_empty()
    }
}
