mod batch_report;
mod candidate_token;
mod corpus;
mod credentials;
mod drug_record;
mod extraction_result;
mod image_format;
mod image_upload;
mod pipeline_settings;
mod processed_image;
mod raw_image;

pub use batch_report::BatchReport;
pub use candidate_token::{CandidateToken, TokenIndex, TokenizationMode};
pub use corpus::Corpus;
pub use credentials::{Credentials, Secret};
pub use drug_record::{CandidateLookup, DrugRecord, LookupOutcome};
pub use extraction_result::ExtractionResult;
pub use image_format::ImageMimeType;
pub use image_upload::ImageUpload;
pub use pipeline_settings::{ExtractorStrategy, PipelineSettings};
pub use processed_image::ProcessedImage;
pub use raw_image::RawImage;
pub(crate) use raw_image::ensure_non_empty_dimensions;
