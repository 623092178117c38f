use crate::domain::ports::Transport;
use crate::utils::error::{HarvestError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// 共用同一個 reqwest Client（連線池）的 HTTP 傳輸層
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value> {
        tracing::debug!("📡 POST {} {}", url, payload);
        let response = self.client.post(url).json(payload).send().await?;

        // 狀態碼不做判斷，成功與否由回應中的 code 決定
        tracing::debug!("API response status: {}", response.status());
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|source| HarvestError::MalformedBody {
            url: url.to_string(),
            source,
        })
    }
}
