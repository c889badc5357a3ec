use crate::domain::model::{QueryResult, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Upstream data source: one request for every launch, no arguments.
#[async_trait]
pub trait LaunchSource: Send + Sync {
    async fn fetch_launches(&self) -> Result<QueryResult>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn output_path(&self) -> &str;
    fn selected_year(&self) -> &str;
    fn selected_sort(&self) -> &str;
    fn locale(&self) -> &str;
    fn utc_offset(&self) -> Option<&str>;
    fn export_formats(&self) -> Vec<String>;
    fn compress_output(&self) -> bool;
    fn export_enabled(&self) -> bool;
    fn timeout_seconds(&self) -> u64;

    /// Custom strftime pattern for display dates; `None` keeps the locale default.
    fn date_pattern(&self) -> Option<&str> {
        None
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<QueryResult>;
    async fn transform(&self, data: QueryResult) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<Vec<String>>;
}
