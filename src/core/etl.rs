use crate::core::Pipeline;
use crate::domain::model::{LaunchEntry, RejectedLaunch};
use crate::utils::error::Result;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct EtlReport {
    pub launches: Vec<Arc<LaunchEntry>>,
    pub rejected: Vec<RejectedLaunch>,
    pub total_records: usize,
    pub available_years: Vec<i32>,
    pub outputs: Vec<String>,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<EtlReport> {
        tracing::info!("Starting launch pipeline...");

        // Extract
        tracing::info!("Fetching launches...");
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Fetched {} launches", raw_data.launches.len());

        // Transform
        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "Selected {} launches ({} skipped)",
            transformed.launches.len(),
            transformed.rejected.len()
        );

        // Load
        let outputs = self.pipeline.load(&transformed).await?;
        for output in &outputs {
            tracing::info!("Output saved to: {}", output);
        }

        Ok(EtlReport {
            launches: transformed.launches,
            rejected: transformed.rejected,
            total_records: transformed.total_records,
            available_years: transformed.available_years,
            outputs,
        })
    }
}
