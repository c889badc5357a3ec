pub mod date_format;
pub mod etl;
pub mod export;
pub mod feed;
pub mod pipeline;
pub mod year_filter;
pub mod year_sort;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{LaunchEntry, QueryResult, TransformResult};
pub use crate::domain::ports::{ConfigProvider, LaunchSource, Pipeline, Storage};
pub use crate::utils::error::Result;
