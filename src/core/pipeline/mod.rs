mod candidate_tokenizer;
mod corpus_aggregator;
mod image_preprocessor;

pub use corpus_aggregator::CorpusAggregator;
pub use image_preprocessor::ImagePreprocessor;
