use crate::config::HarvestConfig;
use crate::utils::error::{HarvestError, Result};
use regex::{Captures, Regex};
use std::path::Path;

impl HarvestConfig {
    /// 從 TOML 檔案載入配置，未提供的欄位使用預設值
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HarvestError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HarvestError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// 替換環境變數 (例如 ${HARVEST_BASE_URL})；未設定的變數保持原樣
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HarvestError::ConfigError {
        message: format!("Invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[api]
base_url = "http://127.0.0.1:9000/api"
timeout_seconds = 10

[api.endpoints]
counties = "getCountyList"

[retry]
initial_delay_seconds = 2
multiplier = 3
ceiling_seconds = 60

[output]
directory = "./out"

[harvest]
fetch_counties = false

[monitoring]
enabled = true
"#;

        let config = HarvestConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api.base_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.api.endpoints.counties, "getCountyList");
        assert_eq!(config.api.endpoints.regions, "getPneProCityCode");
        assert_eq!(config.retry.multiplier, 3);
        assert_eq!(config.output.directory, "./out");
        assert!(!config.harvest.fetch_counties);
        assert!(config.monitoring.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = HarvestConfig::from_toml_str("").unwrap();
        assert_eq!(config, HarvestConfig::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("REGION_HARVEST_TEST_DIR", "/tmp/harvest");

        let toml_content = r#"
[output]
directory = "${REGION_HARVEST_TEST_DIR}"

[api]
base_url = "${REGION_HARVEST_UNSET_VAR}"
"#;

        let config = HarvestConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output.directory, "/tmp/harvest");
        assert_eq!(config.api.base_url, "${REGION_HARVEST_UNSET_VAR}");
        assert!(config.validate().is_err());

        std::env::remove_var("REGION_HARVEST_TEST_DIR");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = HarvestConfig::from_toml_str("[api\nbase_url = 1").unwrap_err();
        assert!(matches!(err, HarvestError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\ndirectory = \"file-test\"\n")
            .unwrap();

        let config = HarvestConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output.directory, "file-test");
    }
}
