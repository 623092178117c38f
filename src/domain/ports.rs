use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 以 JSON body 發出 POST 並解析 JSON 回應
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<Value>;
}

/// 重試等待；測試時以紀錄延遲的實作取代
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn regions_endpoint(&self) -> &str;
    fn province_history_endpoint(&self) -> &str;
    fn city_history_endpoint(&self) -> &str;
    fn counties_endpoint(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn retry_initial_delay_seconds(&self) -> u64;
    fn retry_multiplier(&self) -> u32;
    fn retry_ceiling_seconds(&self) -> u64;
    fn output_dir(&self) -> &str;
    fn fetch_counties(&self) -> bool;
    fn monitoring_enabled(&self) -> bool;
}
