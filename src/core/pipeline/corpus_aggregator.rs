use super::candidate_tokenizer::tokenize;
use crate::core::models::{Corpus, ExtractionResult, TokenizationMode};
use crate::global_constants;

const RESULT_SEPARATOR: &str = "\n\n";

/// Merges per-image results into one corpus. Pure: no I/O, no randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusAggregator {
    max_lookup_line_length: usize,
}

impl Default for CorpusAggregator {
    fn default() -> Self {
        Self::new(global_constants::DEFAULT_MAX_LOOKUP_LINE_LENGTH)
    }
}

impl CorpusAggregator {
    pub fn new(max_lookup_line_length: usize) -> Self {
        Self {
            max_lookup_line_length,
        }
    }

    pub fn aggregate(&self, mut results: Vec<ExtractionResult>) -> Corpus {
        results.sort_by_key(|result| result.source_index);

        let mut corpus = Corpus::default();
        let lookup_mode = TokenizationMode::ShortLines {
            max_length: self.max_lookup_line_length,
        };

        let mut texts = Vec::with_capacity(results.len());
        for result in &results {
            if result.success && !result.raw_text.is_empty() {
                texts.push(result.joined_text());
            }
            corpus
                .token_index
                .extend(tokenize(result, TokenizationMode::FirstWord));
            corpus.lookup_index.extend(tokenize(result, lookup_mode));
        }

        corpus.combined_text = texts.join(RESULT_SEPARATOR);
        corpus.ordered_texts = results;

        log::info!(
            "[AGGREGATOR] aggregated {} results: {} succeeded, {} tokens, {} lookup candidates",
            corpus.ordered_texts.len(),
            corpus.successful_count(),
            corpus.token_index.len(),
            corpus.lookup_index.len()
        );

        corpus
    }
}
