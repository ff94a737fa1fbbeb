use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait InteractionSummarizer: Send + Sync {
    /// Called once per batch with the combined corpus text. No retries.
    async fn summarize(&self, combined_text: &str) -> Result<String>;
}
