use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status} from {endpoint}")]
    HttpStatusError { status: u16, endpoint: String },

    #[error("GraphQL query failed: {message}")]
    GraphQlError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cannot parse launch date '{raw}': {reason}")]
    DateParseError { raw: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Launch data source closed")]
    SourceClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LaunchError {
    pub fn date_parse(raw: &str, reason: impl Into<String>) -> Self {
        LaunchError::DateParseError {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單筆記錄問題，不影響其餘清單
            LaunchError::DateParseError { .. } => ErrorSeverity::Low,
            LaunchError::ApiError(_)
            | LaunchError::HttpStatusError { .. }
            | LaunchError::GraphQlError { .. } => ErrorSeverity::Medium,
            LaunchError::CsvError(_)
            | LaunchError::SerializationError(_)
            | LaunchError::ConfigError { .. }
            | LaunchError::ConfigValidationError { .. }
            | LaunchError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            LaunchError::ZipError(_) | LaunchError::IoError(_) | LaunchError::SourceClosed => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            LaunchError::ApiError(_) | LaunchError::HttpStatusError { .. } => {
                "Check the GraphQL endpoint URL and your network connection, then try again"
            }
            LaunchError::GraphQlError { .. } => {
                "The service rejected the launches query; verify the endpoint serves the SpaceX schema"
            }
            LaunchError::DateParseError { .. } => {
                "The record was skipped; the remaining launches are still shown"
            }
            LaunchError::ConfigError { .. }
            | LaunchError::ConfigValidationError { .. }
            | LaunchError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
            LaunchError::IoError(_) | LaunchError::ZipError(_) => {
                "Make sure the output directory exists and is writable"
            }
            LaunchError::CsvError(_) | LaunchError::SerializationError(_) => {
                "Export failed while encoding records; try a different output format"
            }
            LaunchError::SourceClosed => "The data source stopped publishing; restart the viewer",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LaunchError::ApiError(_) | LaunchError::HttpStatusError { .. } => {
                format!("Could not reach the launch service ({})", self)
            }
            LaunchError::GraphQlError { message } => {
                format!("The launch service returned an error: {}", message)
            }
            LaunchError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;
