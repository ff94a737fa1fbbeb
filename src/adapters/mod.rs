mod cloud_vision_text_extractor;
mod drug_registry_client;
mod openai_interaction_summarizer;
mod tesseract_text_extractor;

pub use cloud_vision_text_extractor::CloudVisionTextExtractor;
pub use drug_registry_client::DrugRegistryClient;
pub use openai_interaction_summarizer::OpenAiInteractionSummarizer;
pub use tesseract_text_extractor::TesseractTextExtractor;
