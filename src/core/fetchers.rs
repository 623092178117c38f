use crate::config::HarvestConfig;
use crate::core::client::ApiClient;
use crate::core::sink::JsonSink;
use crate::domain::model::{request_payload, County, HistoryRecord, Region, Scalar};
use crate::domain::ordering::{sorted_by_key, sorted_tree_by_key};
use crate::domain::ports::{ConfigProvider, Sleeper, Storage, Transport};
use crate::utils::error::{HarvestError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const REGIONS_FILE: &str = "cities.json";

pub fn history_file(region_code: &Scalar) -> String {
    format!("{}.json", region_code)
}

pub fn counties_file(region_code: &Scalar) -> String {
    format!("cities_{}.json", region_code)
}

/// 遠端 API 的端點名稱（接在 base URL 之後）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub regions: String,
    pub province_history: String,
    pub city_history: String,
    pub counties: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_config(&HarvestConfig::default())
    }
}

impl Endpoints {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            regions: config.regions_endpoint().to_string(),
            province_history: config.province_history_endpoint().to_string(),
            city_history: config.city_history_endpoint().to_string(),
            counties: config.counties_endpoint().to_string(),
        }
    }
}

/// 區域清單、異動歷史與區縣清單的抓取；每次抓取後立即寫檔
pub struct RegionFetcher<S: Storage, T: Transport, Z: Sleeper> {
    client: ApiClient<T, Z>,
    sink: JsonSink<S>,
    endpoints: Endpoints,
}

impl<S: Storage, T: Transport, Z: Sleeper> RegionFetcher<S, T, Z> {
    pub fn new(client: ApiClient<T, Z>, sink: JsonSink<S>, endpoints: Endpoints) -> Self {
        Self {
            client,
            sink,
            endpoints,
        }
    }

    pub fn client(&self) -> &ApiClient<T, Z> {
        &self.client
    }

    pub fn sink(&self) -> &JsonSink<S> {
        &self.sink
    }

    /// 抓取省市樹狀清單，各層依代碼排序後寫入 `cities.json`
    pub async fn list_regions(&self) -> Result<Vec<Region>> {
        let endpoint = &self.endpoints.regions;
        let rsp = self
            .client
            .fetch_and_unwrap(endpoint, &request_payload("none", ""))
            .await?;
        let regions: Vec<Region> = self.extract(rsp, endpoint, "cityList")?;

        let regions = sorted_tree_by_key(regions, &|r: &Region| r.code.clone());
        tracing::debug!("Fetched {} top-level regions", regions.len());

        self.sink.write(REGIONS_FILE, &regions).await?;
        Ok(regions)
    }

    /// 抓取單一區域的異動歷史，依日期排序後寫入 `<code>.json`
    pub async fn list_history(
        &self,
        region_code: &Scalar,
        is_top_level: bool,
    ) -> Result<Vec<HistoryRecord>> {
        let (endpoint, param) = if is_top_level {
            (&self.endpoints.province_history, "provinceCode")
        } else {
            (&self.endpoints.city_history, "cityCode")
        };

        let rsp = self
            .client
            .fetch_and_unwrap(endpoint, &request_payload(param, region_code.clone()))
            .await?;
        let records: Vec<HistoryRecord> = self.extract(rsp, endpoint, "modifyHistory")?;

        if records.is_empty() {
            return Err(HarvestError::EmptyHistory {
                code: region_code.to_string(),
            });
        }

        let records = sorted_by_key(records, |r: &HistoryRecord| r.date.clone());
        self.sink.write(&history_file(region_code), &records).await?;
        Ok(records)
    }

    /// 抓取直轄市下的區縣清單；結果非空時才寫入 `cities_<code>.json`
    pub async fn list_counties(&self, region_code: &Scalar) -> Result<Vec<County>> {
        let endpoint = &self.endpoints.counties;
        let rsp = self
            .client
            .fetch_and_unwrap(endpoint, &request_payload("provinceCode", region_code.clone()))
            .await?;

        // null 視為沒有區縣
        let entries: Vec<Value> = if matches!(rsp.get("cityInfo"), Some(Value::Null)) {
            Vec::new()
        } else {
            self.extract(rsp, endpoint, "cityInfo")?
        };

        let counties: Vec<County> = entries.iter().filter_map(County::from_entry).collect();
        let counties = sorted_by_key(counties, |c: &County| c.code.clone());

        if counties.is_empty() {
            tracing::debug!("No counties for {}, skipping write", region_code);
        } else {
            self.sink.write(&counties_file(region_code), &counties).await?;
        }
        Ok(counties)
    }

    fn extract<V: DeserializeOwned>(&self, mut rsp: Value, endpoint: &str, field: &str) -> Result<V> {
        let unexpected = || HarvestError::UnexpectedPayload {
            url: self.client.endpoint_url(endpoint),
            field: field.to_string(),
        };

        let value = rsp.get_mut(field).map(Value::take).ok_or_else(unexpected)?;
        serde_json::from_value(value).map_err(|e| {
            tracing::debug!("Cannot decode '{}' from {}: {}", field, endpoint, e);
            unexpected()
        })
    }
}
