use crate::config::HarvestConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "region-harvest")]
#[command(about = "Harvest region lists and modification history into local JSON files")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Override the output directory
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Override the HTTP timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Do not fetch county lists for municipality-style regions
    #[arg(long)]
    pub no_counties: bool,

    /// Log CPU and memory usage after each top-level region
    #[arg(long)]
    pub monitor: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CliArgs {
    /// 載入設定檔（若有）並套用命令列覆蓋
    pub fn load_config(&self) -> Result<HarvestConfig> {
        let mut config = match &self.config {
            Some(path) => HarvestConfig::from_file(path)?,
            None => HarvestConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut HarvestConfig) {
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output.directory = output_dir.clone();
        }
        if let Some(timeout) = self.timeout {
            config.api.timeout_seconds = timeout;
        }
        if self.no_counties {
            config.harvest.fetch_counties = false;
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_no_flags_gives_defaults() {
        let args = CliArgs::parse_from(["region-harvest"]);
        assert_eq!(args.load_config().unwrap(), HarvestConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\ndirectory = \"from-file\"\n[api]\ntimeout_seconds = 5\n")
            .unwrap();
        let config_path = temp_file.path().to_str().unwrap().to_string();

        let args = CliArgs::parse_from([
            "region-harvest",
            "--config",
            &config_path,
            "--output-dir",
            "from-flag",
            "--no-counties",
            "--monitor",
        ]);
        let config = args.load_config().unwrap();

        assert_eq!(config.output.directory, "from-flag");
        assert_eq!(config.api.timeout_seconds, 5);
        assert!(!config.harvest.fetch_counties);
        assert!(config.monitoring.enabled);
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let args = CliArgs::parse_from(["region-harvest", "-c", "/nonexistent/harvest.toml"]);
        assert!(matches!(
            args.load_config(),
            Err(crate::utils::error::HarvestError::IoError(_))
        ));
    }
}
