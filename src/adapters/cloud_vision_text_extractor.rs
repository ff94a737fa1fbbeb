use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::core::errors::PipelineError;
use crate::core::interfaces::adapters::{ExtractorInput, TextExtractor};
use crate::core::models::{ExtractionResult, Secret};
use crate::global_constants;

/// Remote OCR through the Cloud Vision `images:annotate` endpoint. The
/// service does its own preprocessing, so only original bytes are sent.
pub struct CloudVisionTextExtractor {
    client: reqwest::Client,
    endpoint: String,
    api_key: Secret,
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent,
    features: [Feature<'a>; 1],
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    feature_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    error: Option<ServiceStatus>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ServiceStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

impl CloudVisionTextExtractor {
    pub fn build(
        api_key: Secret,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let endpoint = endpoint.into();

        log::info!("[CLOUD_VISION] Initializing client for {}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    fn build_request_body(image_bytes: &[u8]) -> AnnotateRequest<'static> {
        AnnotateRequest {
            requests: [AnnotateImageRequest {
                image: ImageContent {
                    content: base64::engine::general_purpose::STANDARD.encode(image_bytes),
                },
                features: [Feature {
                    feature_type: global_constants::CLOUD_VISION_FEATURE_TYPE,
                }],
            }],
        }
    }

    /// The first annotation covers the whole image; later ones are fragments.
    fn read_full_text(response: AnnotateResponse) -> Result<String, PipelineError> {
        let Some(image_response) = response.responses.into_iter().next() else {
            return Ok(String::new());
        };

        if let Some(status) = image_response.error {
            return Err(PipelineError::extraction(format!(
                "cloud vision error {}: {}",
                status.code, status.message
            )));
        }

        Ok(image_response
            .text_annotations
            .into_iter()
            .next()
            .map(|annotation| annotation.description)
            .unwrap_or_default())
    }

    async fn annotate(&self, image_bytes: &[u8]) -> Result<AnnotateResponse, PipelineError> {
        let request_url = format!(
            "{}?key={}",
            self.endpoint,
            urlencoding::encode(self.api_key.expose())
        );

        let response = self
            .client
            .post(&request_url)
            .json(&Self::build_request_body(image_bytes))
            .send()
            .await
            .map_err(|e| {
                PipelineError::extraction(format!("cloud vision request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::extraction(format!(
                "cloud vision returned HTTP {}",
                status
            )));
        }

        response.json::<AnnotateResponse>().await.map_err(|e| {
            PipelineError::extraction(format!("unreadable cloud vision response: {}", e.without_url()))
        })
    }
}

#[async_trait]
impl TextExtractor for CloudVisionTextExtractor {
    fn name(&self) -> &str {
        "cloud-vision"
    }

    fn accepts_preprocessed(&self) -> bool {
        false
    }

    async fn extract(
        &self,
        source_index: usize,
        image: ExtractorInput<'_>,
    ) -> Result<ExtractionResult, PipelineError> {
        let ExtractorInput::Raw(raw_image) = image else {
            return Err(PipelineError::extraction(
                "cloud vision only accepts original image bytes",
            ));
        };

        log::info!(
            "[CLOUD_VISION] Sending image {} ({} bytes, {})",
            source_index,
            raw_image.encoded_bytes().len(),
            raw_image.mime_type()
        );

        let response = self.annotate(raw_image.encoded_bytes()).await?;
        let full_text = Self::read_full_text(response)?;

        log::info!(
            "[CLOUD_VISION] Image {} returned {} characters",
            source_index,
            full_text.len()
        );

        Ok(ExtractionResult::from_recognized_text(source_index, &full_text))
    }
}
