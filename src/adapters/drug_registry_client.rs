use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::core::interfaces::adapters::DrugRegistry;
use crate::core::models::{DrugRecord, Secret};

/// Client for the public "easy drug information" registry. Only the item
/// name, efficacy and usage fields are read.
pub struct DrugRegistryClient {
    client: reqwest::Client,
    endpoint: String,
    service_key: Secret,
}

impl DrugRegistryClient {
    pub fn build(service_key: Secret, endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build registry HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            service_key,
        })
    }

    fn construct_lookup_url(&self, candidate: &str) -> String {
        format!(
            "{}?serviceKey={}&itemName={}&type=json",
            self.endpoint,
            urlencoding::encode(self.service_key.expose()),
            urlencoding::encode(candidate.trim())
        )
    }

    fn read_first_record(json: &serde_json::Value) -> Option<DrugRecord> {
        let item = &json["body"]["items"][0];
        if !item.is_object() {
            return None;
        }

        let field = |name: &str| item[name].as_str().unwrap_or_default().trim().to_string();

        Some(DrugRecord {
            item_name: field("itemName"),
            efficacy: field("efcyQesitm"),
            usage_method: field("useMethodQesitm"),
        })
    }
}

#[async_trait]
impl DrugRegistry for DrugRegistryClient {
    async fn lookup(&self, candidate: &str) -> Result<Option<DrugRecord>> {
        log::debug!("[REGISTRY] Looking up '{}'", candidate);

        let response = self
            .client
            .get(self.construct_lookup_url(candidate))
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Registry request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Registry returned HTTP {}", status);
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Registry response is not JSON")?;

        let record = Self::read_first_record(&json);
        log::info!(
            "[REGISTRY] '{}' {}",
            candidate,
            if record.is_some() { "found" } else { "not found" }
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_client() -> DrugRegistryClient {
        DrugRegistryClient::build(
            Secret::new("service-key").unwrap(),
            "http://apis.example.test/getDrbEasyDrugList",
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_construct_lookup_url_escapes_candidate() {
        let url = test_client().construct_lookup_url(" 타이레놀 500mg ");

        assert!(url.starts_with("http://apis.example.test/getDrbEasyDrugList?serviceKey=service-key"));
        assert!(url.contains("itemName=%ED%83%80%EC%9D%B4%EB%A0%88%EB%86%80%20500mg"));
        assert!(url.ends_with("&type=json"));
    }

    #[test]
    fn test_construct_lookup_url_escapes_reserved_characters_in_service_key() {
        let client = DrugRegistryClient::build(
            Secret::new("ab+c/d==&type=xml").unwrap(),
            "http://apis.example.test/getDrbEasyDrugList",
            Duration::from_secs(1),
        )
        .unwrap();

        let url = client.construct_lookup_url("Aspirin");

        assert_eq!(
            url,
            "http://apis.example.test/getDrbEasyDrugList?serviceKey=ab%2Bc%2Fd%3D%3D%26type%3Dxml&itemName=Aspirin&type=json"
        );
        assert_eq!(url.matches("type=").count(), 1);
    }

    #[test]
    fn test_read_first_record_extracts_fields() {
        let json = json!({
            "header": { "resultCode": "00" },
            "body": {
                "totalCount": 1,
                "items": [{
                    "itemName": "타이레놀정500밀리그람",
                    "efcyQesitm": "이 약은 감기로 인한 발열 및 동통에 사용합니다. ",
                    "useMethodQesitm": "1회 1~2정씩 1일 3~4회 복용합니다."
                }]
            }
        });

        let record = DrugRegistryClient::read_first_record(&json).unwrap();

        assert_eq!(record.item_name, "타이레놀정500밀리그람");
        assert_eq!(record.efficacy, "이 약은 감기로 인한 발열 및 동통에 사용합니다.");
        assert_eq!(record.usage_method, "1회 1~2정씩 1일 3~4회 복용합니다.");
    }

    #[test]
    fn test_read_first_record_without_items_is_not_found() {
        let empty_items = json!({ "body": { "totalCount": 0, "items": [] } });
        let missing_items = json!({ "body": { "totalCount": 0 } });
        let blank_items = json!({ "body": { "totalCount": 0, "items": "" } });

        assert!(DrugRegistryClient::read_first_record(&empty_items).is_none());
        assert!(DrugRegistryClient::read_first_record(&missing_items).is_none());
        assert!(DrugRegistryClient::read_first_record(&blank_items).is_none());
    }
}
