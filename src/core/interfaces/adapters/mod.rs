mod drug_registry;
mod interaction_summarizer;
mod text_extractor;

pub use drug_registry::DrugRegistry;
pub use interaction_summarizer::InteractionSummarizer;
pub use text_extractor::{ExtractorInput, TextExtractor};
