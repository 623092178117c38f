pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{HttpTransport, LocalStorage};
pub use config::HarvestConfig;
pub use self::core::{
    client::ApiClient,
    fetchers::{Endpoints, RegionFetcher},
    harvester::{HarvestSummary, Harvester},
    retry::{RecordingSleeper, RetryPolicy},
    sink::JsonSink,
};
pub use utils::error::{HarvestError, Result};
