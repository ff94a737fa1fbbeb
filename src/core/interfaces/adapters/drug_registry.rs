use anyhow::Result;
use async_trait::async_trait;

use crate::core::models::DrugRecord;

#[async_trait]
pub trait DrugRegistry: Send + Sync {
    async fn lookup(&self, candidate: &str) -> Result<Option<DrugRecord>>;
}
