use clap::Parser;
use region_harvest::core::ConfigProvider;
use region_harvest::utils::{logger, validation::Validate};
use region_harvest::{CliArgs, HarvestError, Harvester};

/// 記錄錯誤並依嚴重程度結束行程
fn exit_with(context: &str, e: &HarvestError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code())
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting region-harvest");

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => exit_with("Failed to load configuration", &e),
    };
    tracing::debug!("Resolved config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with("Configuration validation failed", &e);
    }

    if config.monitoring_enabled() {
        tracing::info!("🔍 Resource monitoring enabled");
    }

    let harvester = match Harvester::from_config(&config) {
        Ok(harvester) => harvester,
        Err(e) => exit_with("Failed to build HTTP client", &e),
    };

    match harvester.run().await {
        Ok(summary) => {
            tracing::info!("📁 Output saved to: {}", config.output_dir());
            println!(
                "✅ Harvested {} regions ({} history files, {} county lists)",
                summary.top_level_regions, summary.history_files, summary.county_lists
            );
            println!("📁 Output saved to: {}", config.output_dir());
        }
        Err(e) => exit_with("Harvest failed", &e),
    }
}
