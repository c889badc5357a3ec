pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{GraphQlLaunchSource, LocalStorage};
pub use core::date_format::{DateFormatter, TimeBasis};
pub use core::feed::{LaunchDataPipeline, LaunchFeed, LaunchInputs, SortedFeed};
pub use core::year_filter::filter_by_year;
pub use core::year_sort::{sort_by_year, SortOrder};
pub use core::{etl::EtlEngine, pipeline::LaunchPipeline};
pub use domain::model::{Launch, LaunchEntry, QueryResult, RejectedLaunch};
pub use utils::error::{LaunchError, Result};
