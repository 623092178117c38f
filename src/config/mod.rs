#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://wechat.wecity.qq.com/trpcapi/THPneumoniaDataService";

/// 完整設定：內建預設 → TOML 檔 → 命令列參數
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub api: ApiConfig,
    pub retry: RetryConfig,
    pub output: OutputConfig,
    pub harvest: TraversalConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub endpoints: EndpointConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
            endpoints: EndpointConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub regions: String,
    pub province_history: String,
    pub city_history: String,
    pub counties: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            regions: "getPneProCityCode".to_string(),
            province_history: "getProvinceInfoHisByCode".to_string(),
            city_history: "getCityInfoHisByCode".to_string(),
            counties: "getCityInfoByProCode".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub initial_delay_seconds: u64,
    pub multiplier: u32,
    pub ceiling_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_seconds: 1,
            multiplier: 2,
            ceiling_seconds: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "data".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// 關閉時不抓直轄市的區縣資料
    pub fetch_counties: bool,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            fetch_counties: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl Validate for HarvestConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_positive_number("api.timeout_seconds", self.api.timeout_seconds as usize, 1)?;

        let endpoints = &self.api.endpoints;
        validate_non_empty_string("api.endpoints.regions", &endpoints.regions)?;
        validate_non_empty_string("api.endpoints.province_history", &endpoints.province_history)?;
        validate_non_empty_string("api.endpoints.city_history", &endpoints.city_history)?;
        validate_non_empty_string("api.endpoints.counties", &endpoints.counties)?;

        validate_positive_number("retry.multiplier", self.retry.multiplier as usize, 2)?;
        validate_positive_number("retry.ceiling_seconds", self.retry.ceiling_seconds as usize, 1)?;
        validate_range(
            "retry.initial_delay_seconds",
            self.retry.initial_delay_seconds,
            1,
            self.retry.ceiling_seconds,
        )?;

        validate_path("output.directory", &self.output.directory)?;

        Ok(())
    }
}

impl ConfigProvider for HarvestConfig {
    fn base_url(&self) -> &str {
        &self.api.base_url
    }

    fn regions_endpoint(&self) -> &str {
        &self.api.endpoints.regions
    }

    fn province_history_endpoint(&self) -> &str {
        &self.api.endpoints.province_history
    }

    fn city_history_endpoint(&self) -> &str {
        &self.api.endpoints.city_history
    }

    fn counties_endpoint(&self) -> &str {
        &self.api.endpoints.counties
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds
    }

    fn retry_initial_delay_seconds(&self) -> u64 {
        self.retry.initial_delay_seconds
    }

    fn retry_multiplier(&self) -> u32 {
        self.retry.multiplier
    }

    fn retry_ceiling_seconds(&self) -> u64 {
        self.retry.ceiling_seconds
    }

    fn output_dir(&self) -> &str {
        &self.output.directory
    }

    fn fetch_counties(&self) -> bool {
        self.harvest.fetch_counties
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetchers::Endpoints;
    use crate::utils::error::HarvestError;

    #[test]
    fn test_defaults_are_valid() {
        let config = HarvestConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.output_dir(), "data");
        assert!(config.fetch_counties());
        assert!(!config.monitoring_enabled());
        assert_eq!(Endpoints::from_config(&config).regions, "getPneProCityCode");
    }

    #[test]
    fn test_invalid_retry_settings_are_rejected() {
        let mut config = HarvestConfig::default();
        config.retry.multiplier = 1;
        assert!(config.validate().is_err());

        let mut config = HarvestConfig::default();
        config.retry.initial_delay_seconds = 64;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_output_directory_is_rejected() {
        let mut config = HarvestConfig::default();
        config.output.directory = String::new();
        assert!(config.validate().is_err());

        config.output.directory = "da\0ta".to_string();
        assert!(matches!(
            config.validate(),
            Err(HarvestError::InvalidConfigValueError { .. })
        ));
    }
}
