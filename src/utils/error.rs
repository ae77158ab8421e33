use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("{step} step failed with exit code {code}")]
    StepFailed { step: String, code: i32 },

    #[error("Failed to launch {step} step: {source}")]
    StepLaunch {
        step: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ForecastError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ForecastError::ApiError(_) => ErrorSeverity::Medium,
            ForecastError::CsvError(_)
            | ForecastError::SerializationError(_)
            | ForecastError::ProcessingError { .. }
            | ForecastError::StepFailed { .. } => ErrorSeverity::High,
            ForecastError::IoError(_) | ForecastError::StepLaunch { .. } => ErrorSeverity::Critical,
            ForecastError::ConfigError { .. }
            | ForecastError::InvalidConfigValueError { .. }
            | ForecastError::MissingConfigError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ForecastError::ApiError(_) => {
                "Check network connectivity and the configured API base URLs, then retry"
            }
            ForecastError::CsvError(_) => "Inspect the CSV output directory for partial files",
            ForecastError::IoError(_) => "Check filesystem permissions and available disk space",
            ForecastError::SerializationError(_) => "The upstream API may have changed its schema",
            ForecastError::ConfigError { .. }
            | ForecastError::InvalidConfigValueError { .. }
            | ForecastError::MissingConfigError { .. } => {
                "Review the CLI flags and configuration file"
            }
            ForecastError::ProcessingError { .. } => {
                "Re-run with --verbose to see per-coin diagnostics"
            }
            ForecastError::StepFailed { .. } => "Inspect the failing step's output above",
            ForecastError::StepLaunch { .. } => {
                "Make sure the step binaries are installed next to the sequencer"
            }
        }
    }

    /// Process exit code for this error. A failed step propagates the child's
    /// own exit code; configuration problems exit 2; everything else exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            ForecastError::StepFailed { code, .. } => *code,
            ForecastError::ConfigError { .. }
            | ForecastError::InvalidConfigValueError { .. }
            | ForecastError::MissingConfigError { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
