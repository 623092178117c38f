use crate::adapters::HttpTransport;
use crate::core::retry::RetryPolicy;
use crate::domain::model::Envelope;
use crate::domain::ports::{ConfigProvider, Sleeper, TokioSleeper, Transport};
use crate::utils::error::{HarvestError, Result};
use serde_json::Value;
use std::time::Duration;

/// 帶重試的 API 客戶端：傳輸失敗依 RetryPolicy 重試，`code != 0` 立即失敗
pub struct ApiClient<T: Transport = HttpTransport, Z: Sleeper = TokioSleeper> {
    transport: T,
    sleeper: Z,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_seconds()))?;
        let retry = RetryPolicy::new(
            Duration::from_secs(config.retry_initial_delay_seconds()),
            config.retry_multiplier(),
            Duration::from_secs(config.retry_ceiling_seconds()),
        );
        Ok(Self::new(transport, TokioSleeper, config.base_url(), retry))
    }
}

impl<T: Transport, Z: Sleeper> ApiClient<T, Z> {
    pub fn new(transport: T, sleeper: Z, base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper,
            base_url: base_url.into(),
            retry,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sleeper(&self) -> &Z {
        &self.sleeper
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// POST 到 `endpoint`，回傳 `rsp` 欄位
    pub async fn fetch_and_unwrap(&self, endpoint: &str, payload: &Value) -> Result<Value> {
        let url = self.endpoint_url(endpoint);
        let body = self
            .retry
            .run(&self.sleeper, || self.transport.post_json(&url, payload))
            .await?;

        if body.get("code").and_then(Value::as_i64) == Some(0) {
            let envelope: Envelope = serde_json::from_value(body)?;
            return Ok(envelope.rsp);
        }

        Err(HarvestError::Envelope {
            url,
            response: body,
        })
    }
}
