use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::core::interfaces::adapters::InteractionSummarizer;
use crate::core::models::Secret;

pub struct OpenAiInteractionSummarizer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    instruction_template: String,
    api_key: Secret,
}

impl OpenAiInteractionSummarizer {
    pub fn build(
        api_key: Secret,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        instruction_template: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build summarization HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            instruction_template: instruction_template.into(),
            api_key,
        })
    }

    fn build_prompt(&self, combined_text: &str) -> String {
        format!("{}\n\n{}", self.instruction_template, combined_text)
    }

    fn build_request_body(&self, combined_text: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": self.build_prompt(combined_text) }
            ]
        })
    }

    fn read_reply(json: &serde_json::Value) -> Result<String> {
        if let Some(message) = json["error"]["message"].as_str() {
            anyhow::bail!("Summarization service error: {}", message);
        }

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Failed to extract reply from summarization response"))?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl InteractionSummarizer for OpenAiInteractionSummarizer {
    async fn summarize(&self, combined_text: &str) -> Result<String> {
        log::info!(
            "[OPENAI] Requesting interaction summary for {} characters with model {}",
            combined_text.len(),
            self.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&self.build_request_body(combined_text))
            .send()
            .await
            .context("Summarization request failed")?;

        let response_text = response
            .text()
            .await
            .context("Failed to read summarization response")?;
        let json: serde_json::Value =
            serde_json::from_str(&response_text).context("Summarization response is not JSON")?;

        let reply = Self::read_reply(&json)?;
        log::info!("[OPENAI] Received summary of {} characters", reply.len());

        Ok(reply)
    }
}
