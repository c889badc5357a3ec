use crate::core::date_format::{parse_utc_offset, DateFormatter, TimeBasis};
use crate::core::export::{bundle_zip, render, ZIP_FILENAME};
use crate::core::feed::{LaunchDataPipeline, LaunchInputs};
use crate::core::year_filter::available_years;
use crate::core::year_sort::SortOrder;
use crate::domain::model::{QueryResult, TransformResult};
use crate::domain::ports::{ConfigProvider, LaunchSource, Pipeline, Storage};
use crate::utils::error::{LaunchError, Result};

/// Builds the date formatter described by the configuration.
pub fn formatter_from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<DateFormatter> {
    let mut formatter = DateFormatter::from_locale_name(config.locale())?;
    if let Some(pattern) = config.date_pattern() {
        formatter = formatter.with_pattern(pattern)?;
    }
    match config.utc_offset() {
        Some(offset) => {
            let offset =
                parse_utc_offset(offset).map_err(|reason| LaunchError::InvalidConfigValueError {
                    field: "utc_offset".to_string(),
                    value: offset.to_string(),
                    reason,
                })?;
            Ok(formatter.with_time_basis(TimeBasis::Fixed(offset)))
        }
        None => Ok(formatter),
    }
}

/// Fetch → normalize/filter/sort → export, driven by a [`ConfigProvider`].
pub struct LaunchPipeline<L: LaunchSource, S: Storage, C: ConfigProvider> {
    source: L,
    storage: S,
    config: C,
    feed_pipeline: LaunchDataPipeline,
}

impl<L: LaunchSource, S: Storage, C: ConfigProvider> LaunchPipeline<L, S, C> {
    pub fn new(source: L, storage: S, config: C) -> Result<Self> {
        let formatter = formatter_from_config(&config)?;
        tracing::debug!(
            "Display dates: locale {:?}, pattern {:?}, basis {:?}",
            formatter.locale(),
            formatter.pattern(),
            formatter.time_basis()
        );
        Ok(Self {
            source,
            storage,
            config,
            feed_pipeline: LaunchDataPipeline::new(formatter),
        })
    }
}

#[async_trait::async_trait]
impl<L: LaunchSource, S: Storage, C: ConfigProvider> Pipeline for LaunchPipeline<L, S, C> {
    async fn extract(&self) -> Result<QueryResult> {
        self.source.fetch_launches().await
    }

    async fn transform(&self, data: QueryResult) -> Result<TransformResult> {
        let total_records = data.launches.len();

        // 與 UI 相同的組合方式：先篩選年份，再排序
        let inputs = LaunchInputs::new();
        let mut feed = inputs.sorted_feed(&self.feed_pipeline);
        inputs.select_year(self.config.selected_year());
        inputs.select_sort(self.config.selected_sort());
        inputs.publish_result(data);

        let launches = feed.launches().to_vec();
        let rejected = feed.upstream().rejected().to_vec();
        let available_years = available_years(feed.upstream().all_launches());

        if !rejected.is_empty() {
            tracing::warn!("{} launches skipped because of unreadable dates", rejected.len());
        }
        tracing::debug!(
            "Year {:?}, order {}: {} of {} launches selected",
            self.config.selected_year(),
            SortOrder::parse(self.config.selected_sort())
                .map(|order| order.as_str())
                .unwrap_or("source"),
            launches.len(),
            total_records
        );

        Ok(TransformResult {
            launches,
            rejected,
            total_records,
            available_years,
        })
    }

    async fn load(&self, result: &TransformResult) -> Result<Vec<String>> {
        if !self.config.export_enabled() {
            tracing::debug!("Export disabled, nothing written");
            return Ok(Vec::new());
        }

        let files = render(&result.launches, &self.config.export_formats())?;
        let base = self.config.output_path().trim_end_matches('/');

        if self.config.compress_output() {
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let zip_data = bundle_zip(&files)?;
            self.storage.write_file(ZIP_FILENAME, &zip_data).await?;
            return Ok(vec![format!("{}/{}", base, ZIP_FILENAME)]);
        }

        let mut written = Vec::with_capacity(files.len());
        for file in &files {
            self.storage.write_file(&file.name, &file.contents).await?;
            written.push(format!("{}/{}", base, file.name));
        }
        Ok(written)
    }
}
