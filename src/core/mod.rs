pub mod client;
pub mod fetchers;
pub mod harvester;
pub mod retry;
pub mod sink;

pub use crate::domain::model::{County, HistoryRecord, Region, Scalar};
pub use crate::domain::ports::{ConfigProvider, Sleeper, Storage, Transport};
pub use crate::utils::error::Result;
