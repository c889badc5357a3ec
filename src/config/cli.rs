use crate::adapters::graphql::DEFAULT_ENDPOINT;
use crate::config::{DEFAULT_FORMATS, DEFAULT_OUTPUT_PATH, DEFAULT_TIMEOUT_SECONDS};
use crate::core::date_format::DEFAULT_LOCALE;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Unset options fall back to the crate defaults, or to the TOML file given
/// with `--config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "launch-board")]
#[command(about = "List SpaceX launches filtered by year and sorted chronologically")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// GraphQL endpoint serving the launches query
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Only show launches from this year (e.g. 2020)
    #[arg(long)]
    pub year: Option<String>,

    /// "Ascending" or "Descending"; anything else keeps the service order
    #[arg(long)]
    pub sort: Option<String>,

    /// Locale for display dates (e.g. en_US, fr_FR)
    #[arg(long)]
    pub locale: Option<String>,

    /// Show dates in this offset instead of the launch site's (e.g. +00:00)
    #[arg(long)]
    pub utc_offset: Option<String>,

    /// Custom strftime pattern for display dates
    #[arg(long)]
    pub date_pattern: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    /// Export formats: csv, tsv, json
    #[arg(long, value_delimiter = ',')]
    pub formats: Option<Vec<String>>,

    /// Bundle exported files into launches.zip
    #[arg(long)]
    pub zip: bool,

    /// Only print the table, do not write files
    #[arg(long)]
    pub no_export: bool,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn selected_year(&self) -> &str {
        self.year.as_deref().unwrap_or("")
    }

    fn selected_sort(&self) -> &str {
        self.sort.as_deref().unwrap_or("")
    }

    fn locale(&self) -> &str {
        self.locale.as_deref().unwrap_or(DEFAULT_LOCALE)
    }

    fn utc_offset(&self) -> Option<&str> {
        self.utc_offset.as_deref()
    }

    fn export_formats(&self) -> Vec<String> {
        match &self.formats {
            Some(formats) => formats.clone(),
            None => DEFAULT_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }

    fn compress_output(&self) -> bool {
        self.zip
    }

    fn export_enabled(&self) -> bool {
        !self.no_export
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn date_pattern(&self) -> Option<&str> {
        self.date_pattern.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", self.endpoint())?;
        validation::validate_year("year", self.selected_year())?;
        validation::validate_sort("sort", self.selected_sort())?;
        validation::validate_non_empty_string("locale", self.locale())?;
        if let Some(offset) = self.utc_offset() {
            validation::validate_utc_offset("utc_offset", offset)?;
        }
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds(), 1)?;
        if self.export_enabled() {
            validation::validate_path("output_path", self.output_path())?;
            validation::validate_formats("formats", &self.export_formats())?;
        }
        Ok(())
    }
}
