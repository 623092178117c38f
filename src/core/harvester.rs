use crate::adapters::{HttpTransport, LocalStorage};
use crate::core::client::ApiClient;
use crate::core::fetchers::{Endpoints, RegionFetcher};
use crate::core::sink::JsonSink;
use crate::domain::ports::{ConfigProvider, Sleeper, Storage, TokioSleeper, Transport};
use crate::utils::error::Result;
use crate::utils::monitor::ResourceMonitor;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub top_level_regions: usize,
    pub history_files: usize,
    pub county_lists: usize,
    pub counties: usize,
    pub elapsed: Duration,
}

/// 依序走訪 省 → 市 →（直轄市）區縣，每個節點抓取並寫出異動歷史。
///
/// 任一步驟失敗即中止整個流程，已寫出的檔案保留。
pub struct Harvester<S: Storage, T: Transport = HttpTransport, Z: Sleeper = TokioSleeper> {
    fetcher: RegionFetcher<S, T, Z>,
    fetch_counties: bool,
    monitor: ResourceMonitor,
}

impl Harvester<LocalStorage> {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = ApiClient::from_config(config)?;
        let sink = JsonSink::new(LocalStorage::new(config.output_dir()));
        let fetcher = RegionFetcher::new(client, sink, Endpoints::from_config(config));

        Ok(Self::new_with_monitoring(
            fetcher,
            config.fetch_counties(),
            config.monitoring_enabled(),
        ))
    }
}

impl<S: Storage, T: Transport, Z: Sleeper> Harvester<S, T, Z> {
    pub fn new(fetcher: RegionFetcher<S, T, Z>, fetch_counties: bool) -> Self {
        Self::new_with_monitoring(fetcher, fetch_counties, false)
    }

    pub fn new_with_monitoring(
        fetcher: RegionFetcher<S, T, Z>,
        fetch_counties: bool,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            fetcher,
            fetch_counties,
            monitor: ResourceMonitor::new(monitor_enabled),
        }
    }

    pub fn fetcher(&self) -> &RegionFetcher<S, T, Z> {
        &self.fetcher
    }

    pub async fn run(&self) -> Result<HarvestSummary> {
        let started = Instant::now();
        let mut summary = HarvestSummary::default();

        tracing::info!("🌐 Fetching region list...");
        let regions = self.fetcher.list_regions().await?;
        summary.top_level_regions = regions.len();
        tracing::info!("📋 {} top-level regions", regions.len());

        for province in &regions {
            tracing::info!("🗺️  {} ({})", province.label(), province.code);
            self.fetcher.list_history(&province.code, true).await?;
            summary.history_files += 1;

            // 代碼與省份相同的子節點就是省份本身
            for city in province
                .children
                .iter()
                .filter(|city| city.code != province.code)
            {
                tracing::info!("  🏙️  {} ({})", city.label(), city.code);
                self.fetcher.list_history(&city.code, false).await?;
                summary.history_files += 1;
            }

            if self.fetch_counties && province.children.len() == 1 {
                let counties = self.fetcher.list_counties(&province.code).await?;
                if !counties.is_empty() {
                    summary.county_lists += 1;
                }

                for county in &counties {
                    tracing::info!("    🏘️  {} ({})", county.label, county.code);
                    self.fetcher.list_history(&county.code, false).await?;
                    summary.history_files += 1;
                    summary.counties += 1;
                }
            }

            self.monitor.log_stats(&format!("Region {}", province.code));
        }

        summary.elapsed = started.elapsed();
        self.monitor.log_final_stats();
        tracing::info!(
            "✅ Harvested {} regions: {} history files, {} county lists in {:?}",
            summary.top_level_regions,
            summary.history_files,
            summary.county_lists,
            summary.elapsed
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::retry::{RecordingSleeper, RetryPolicy};
    use crate::utils::error::HarvestError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn file_names(&self) -> Vec<String> {
            let mut names: Vec<_> = self.files.lock().unwrap().keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().unwrap();
            files.get(path).cloned().ok_or_else(|| {
                HarvestError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().unwrap();
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    /// 模擬遠端 API：區域清單固定，歷史一律回傳一筆，記錄所有呼叫
    struct MockApi {
        city_list: Value,
        county_info: Value,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockApi {
        fn new(city_list: Value, county_info: Value) -> Self {
            Self {
                city_list,
                county_info,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for MockApi {
        async fn post_json(&self, url: &str, payload: &Value) -> Result<Value> {
            let endpoint = url.rsplit('/').next().unwrap_or_default().to_string();
            let param = payload["request"]["req"]
                .as_object()
                .and_then(|req| req.values().next())
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            self.calls.lock().unwrap().push((endpoint.clone(), param));

            let rsp = match endpoint.as_str() {
                "getPneProCityCode" => json!({"cityList": self.city_list}),
                "getCityInfoByProCode" => json!({"cityInfo": self.county_info}),
                _ => json!({"modifyHistory": [{"date": "2020-02-01", "confirm": 1}]}),
            };
            Ok(json!({"code": 0, "rsp": rsp}))
        }
    }

    fn harvester(
        api: MockApi,
        fetch_counties: bool,
    ) -> (Harvester<MockStorage, MockApi, RecordingSleeper>, MockStorage) {
        let storage = MockStorage::default();
        let client = ApiClient::new(api, RecordingSleeper::new(), "http://api", RetryPolicy::default());
        let fetcher = RegionFetcher::new(client, JsonSink::new(storage.clone()), Endpoints::default());
        (Harvester::new(fetcher, fetch_counties), storage)
    }

    fn calls(harvester: &Harvester<MockStorage, MockApi, RecordingSleeper>) -> Vec<(String, String)> {
        harvester
            .fetcher()
            .client()
            .transport()
            .calls
            .lock()
            .unwrap()
            .clone()
    }

    fn call(endpoint: &str, param: &str) -> (String, String) {
        (endpoint.to_string(), param.to_string())
    }

    #[tokio::test]
    async fn test_municipality_fetches_own_history_and_counties() {
        let api = MockApi::new(
            json!([{"cityCode": "11", "cityName": "北京", "children": [
                {"cityCode": "11", "cityName": "北京", "children": []}
            ]}]),
            json!([
                {"cityCode": "110105", "cityName": "朝阳区"},
                {"cityCode": "110101", "cityName": "东城区"}
            ]),
        );
        let (harvester, storage) = harvester(api, true);

        let summary = harvester.run().await.unwrap();

        assert_eq!(
            calls(&harvester),
            vec![
                call("getPneProCityCode", ""),
                call("getProvinceInfoHisByCode", "11"),
                call("getCityInfoByProCode", "11"),
                call("getCityInfoHisByCode", "110101"),
                call("getCityInfoHisByCode", "110105"),
            ]
        );
        assert_eq!(
            storage.file_names(),
            vec!["11.json", "110101.json", "110105.json", "cities.json", "cities_11.json"]
        );
        assert_eq!(summary.top_level_regions, 1);
        assert_eq!(summary.history_files, 3);
        assert_eq!(summary.county_lists, 1);
        assert_eq!(summary.counties, 2);
    }

    #[tokio::test]
    async fn test_municipality_without_counties_mode() {
        let api = MockApi::new(
            json!([{"cityCode": "11", "children": [{"cityCode": "11", "children": []}]}]),
            json!([{"cityCode": "110101"}]),
        );
        let (harvester, storage) = harvester(api, false);

        harvester.run().await.unwrap();

        assert_eq!(
            calls(&harvester),
            vec![
                call("getPneProCityCode", ""),
                call("getProvinceInfoHisByCode", "11"),
            ]
        );
        assert_eq!(storage.file_names(), vec!["11.json", "cities.json"]);
    }

    #[tokio::test]
    async fn test_province_with_two_cities_skips_counties() {
        let api = MockApi::new(
            json!([{"cityCode": "44", "children": [
                {"cityCode": "4403", "children": []},
                {"cityCode": "4401", "children": []}
            ]}]),
            json!([{"cityCode": "999"}]),
        );
        let (harvester, _storage) = harvester(api, true);

        let summary = harvester.run().await.unwrap();

        assert_eq!(
            calls(&harvester),
            vec![
                call("getPneProCityCode", ""),
                call("getProvinceInfoHisByCode", "44"),
                call("getCityInfoHisByCode", "4401"),
                call("getCityInfoHisByCode", "4403"),
            ]
        );
        assert_eq!(summary.history_files, 3);
        assert_eq!(summary.county_lists, 0);
    }

    #[tokio::test]
    async fn test_single_distinct_child_is_fetched_and_triggers_county_lookup() {
        let api = MockApi::new(
            json!([{"cityCode": "71", "children": [{"cityCode": "7101", "children": []}]}]),
            json!([]),
        );
        let (harvester, storage) = harvester(api, true);

        let summary = harvester.run().await.unwrap();

        assert_eq!(
            calls(&harvester),
            vec![
                call("getPneProCityCode", ""),
                call("getProvinceInfoHisByCode", "71"),
                call("getCityInfoHisByCode", "7101"),
                call("getCityInfoByProCode", "71"),
            ]
        );
        assert_eq!(summary.county_lists, 0);
        assert!(!storage.file_names().contains(&"cities_71.json".to_string()));
    }

    #[tokio::test]
    async fn test_provinces_visited_in_code_order() {
        let api = MockApi::new(
            json!([
                {"cityCode": "50", "children": []},
                {"cityCode": "12", "children": []}
            ]),
            json!([]),
        );
        let (harvester, _storage) = harvester(api, true);

        harvester.run().await.unwrap();

        let provinces: Vec<_> = calls(&harvester)
            .into_iter()
            .filter(|(endpoint, _)| endpoint == "getProvinceInfoHisByCode")
            .map(|(_, code)| code)
            .collect();
        assert_eq!(provinces, vec!["12", "50"]);
    }
}
