use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response body from {url}: {source}")]
    MalformedBody {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse data from {url}. Response: {response}")]
    Envelope {
        url: String,
        response: serde_json::Value,
    },

    #[error("History data for {code} is empty. Something is wrong.")]
    EmptyHistory { code: String },

    #[error("Unexpected payload from {url}: field '{field}' is missing or malformed")]
    UnexpectedPayload { url: String, field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HarvestError {
    /// 只有傳輸層錯誤（連線、逾時、無法解析的回應）會被重試
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HarvestError::Transport(_) | HarvestError::MalformedBody { .. }
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            HarvestError::Transport(_) | HarvestError::MalformedBody { .. } => {
                ErrorCategory::Network
            }
            HarvestError::Envelope { .. } | HarvestError::UnexpectedPayload { .. } => {
                ErrorCategory::Api
            }
            HarvestError::EmptyHistory { .. } => ErrorCategory::Data,
            HarvestError::IoError(_) | HarvestError::SerializationError(_) => {
                ErrorCategory::Storage
            }
            HarvestError::ConfigError { .. } | HarvestError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Api | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 行程退出碼：Medium → 2、High → 1、Critical → 3
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HarvestError::Transport(_) | HarvestError::MalformedBody { .. } => {
                "Check network connectivity and the API base URL, then run the harvest again"
            }
            HarvestError::Envelope { .. } => {
                "The API rejected the request; verify the endpoint names and request parameters"
            }
            HarvestError::UnexpectedPayload { .. } => {
                "The API response shape changed; inspect the response and update the endpoint configuration"
            }
            HarvestError::EmptyHistory { .. } => {
                "The upstream data looks inconsistent; retry later or report the region code upstream"
            }
            HarvestError::IoError(_) | HarvestError::SerializationError(_) => {
                "Make sure the output directory is writable and the disk has free space"
            }
            HarvestError::ConfigError { .. } | HarvestError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and try again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HarvestError::Transport(_) | HarvestError::MalformedBody { .. } => {
                format!("Could not reach the region API: {}", self)
            }
            HarvestError::Envelope { url, .. } => {
                format!("The region API reported a failure for {}", url)
            }
            HarvestError::EmptyHistory { code } => {
                format!("Region {} returned no modification history", code)
            }
            HarvestError::UnexpectedPayload { url, field } => {
                format!("Response from {} has no usable '{}' field", url, field)
            }
            HarvestError::IoError(e) => format!("Could not write output files: {}", e),
            HarvestError::SerializationError(e) => format!("Could not encode output: {}", e),
            HarvestError::ConfigError { message } => format!("Invalid configuration: {}", message),
            HarvestError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration for '{}': {}", field, reason)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
