use crate::adapters::graphql::DEFAULT_ENDPOINT;
use crate::core::date_format::DEFAULT_LOCALE;
use crate::core::ConfigProvider;
use crate::utils::error::{LaunchError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub year: Option<String>,
    pub sort: Option<String>,
    pub locale: Option<String>,
    pub utc_offset: Option<String>,
    pub date_pattern: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadConfig {
    pub enabled: Option<bool>,
    pub output_path: Option<String>,
    pub formats: Option<Vec<String>>,
    pub compress: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LaunchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LaunchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SPACEX_ENDPOINT})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LaunchError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Command line values win over the file.
    #[cfg(feature = "cli")]
    pub fn apply_cli_overrides(&mut self, cli: &crate::config::CliConfig) {
        if let Some(endpoint) = &cli.endpoint {
            self.source.endpoint = Some(endpoint.clone());
        }
        if let Some(timeout) = cli.timeout_seconds {
            self.source.timeout_seconds = Some(timeout);
        }
        if let Some(year) = &cli.year {
            self.display.year = Some(year.clone());
        }
        if let Some(sort) = &cli.sort {
            self.display.sort = Some(sort.clone());
        }
        if let Some(locale) = &cli.locale {
            self.display.locale = Some(locale.clone());
        }
        if let Some(offset) = &cli.utc_offset {
            self.display.utc_offset = Some(offset.clone());
        }
        if let Some(pattern) = &cli.date_pattern {
            self.display.date_pattern = Some(pattern.clone());
        }
        if let Some(path) = &cli.output_path {
            self.load.output_path = Some(path.clone());
        }
        if let Some(formats) = &cli.formats {
            self.load.formats = Some(formats.clone());
        }
        if cli.zip {
            self.load.compress = Some(true);
        }
        if cli.no_export {
            self.load.enabled = Some(false);
        }
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.endpoint", self.endpoint())?;
        validation::validate_positive_number("source.timeout_seconds", self.timeout_seconds(), 1)?;
        validation::validate_year("display.year", self.selected_year())?;
        validation::validate_sort("display.sort", self.selected_sort())?;
        validation::validate_non_empty_string("display.locale", self.locale())?;
        if let Some(offset) = self.utc_offset() {
            validation::validate_utc_offset("display.utc_offset", offset)?;
        }
        if self.export_enabled() {
            validation::validate_path("load.output_path", self.output_path())?;
            validation::validate_formats("load.formats", &self.export_formats())?;
        }
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> &str {
        self.source.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn output_path(&self) -> &str {
        self.load
            .output_path
            .as_deref()
            .unwrap_or(crate::config::DEFAULT_OUTPUT_PATH)
    }

    fn selected_year(&self) -> &str {
        self.display.year.as_deref().unwrap_or("")
    }

    fn selected_sort(&self) -> &str {
        self.display.sort.as_deref().unwrap_or("")
    }

    fn locale(&self) -> &str {
        self.display.locale.as_deref().unwrap_or(DEFAULT_LOCALE)
    }

    fn utc_offset(&self) -> Option<&str> {
        self.display.utc_offset.as_deref()
    }

    fn export_formats(&self) -> Vec<String> {
        match &self.load.formats {
            Some(formats) => formats.clone(),
            None => crate::config::DEFAULT_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }

    fn compress_output(&self) -> bool {
        self.load.compress.unwrap_or(false)
    }

    fn export_enabled(&self) -> bool {
        self.load.enabled.unwrap_or(true)
    }

    fn timeout_seconds(&self) -> u64 {
        self.source
            .timeout_seconds
            .unwrap_or(crate::config::DEFAULT_TIMEOUT_SECONDS)
    }

    fn date_pattern(&self) -> Option<&str> {
        self.display.date_pattern.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[source]
endpoint = "https://api.example.com/graphql"
timeout_seconds = 10

[display]
year = "2020"
sort = "Ascending"
locale = "de_DE"

[load]
output_path = "./test-output"
formats = ["csv", "json"]
compress = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.endpoint(), "https://api.example.com/graphql");
        assert_eq!(config.timeout_seconds(), 10);
        assert_eq!(config.selected_year(), "2020");
        assert_eq!(config.selected_sort(), "Ascending");
        assert_eq!(config.locale(), "de_DE");
        assert!(config.compress_output());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.locale(), "en_US");
        assert_eq!(config.export_formats(), vec!["csv", "json"]);
        assert!(config.export_enabled());
        assert!(!config.verbose_logging());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LAUNCH_BOARD_TEST_ENDPOINT", "https://test.api.com");

        let toml_content = r#"
[source]
endpoint = "${LAUNCH_BOARD_TEST_ENDPOINT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.endpoint(), "https://test.api.com");

        std::env::remove_var("LAUNCH_BOARD_TEST_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[source]
endpoint = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let bad_format = TomlConfig::from_toml_str("[load]\nformats = [\"xlsx\"]\n").unwrap();
        assert!(bad_format.validate().is_err());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides() {
        let mut config = TomlConfig::from_toml_str(
            r#"
[display]
year = "2019"
sort = "Ascending"

[load]
compress = false
"#,
        )
        .unwrap();

        let overrides = crate::config::CliConfig {
            year: Some("2020".to_string()),
            zip: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&overrides);

        assert_eq!(config.selected_year(), "2020");
        assert_eq!(config.selected_sort(), "Ascending");
        assert!(config.compress_output());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[display]
locale = "fr_FR"

[logging]
verbose = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.locale(), "fr_FR");
        assert!(config.verbose_logging());
    }
}
