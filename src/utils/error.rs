use crate::domain::model::AttributeCategory;
use thiserror::Error;

/// A bitstring could not be matched against its dictionary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("bitstring has {bits} positions but the dictionary has {entries} entries")]
    LengthMismatch { bits: usize, entries: usize },

    #[error("invalid bit character {found:?} at position {position}")]
    InvalidBitCharacter { position: usize, found: char },
}

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid services pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Service code '{code}' is not present in the services dictionary")]
    UnknownServiceCode { code: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Store {store_id}: cannot decode {category}: {source}")]
    Decode {
        store_id: i64,
        category: AttributeCategory,
        #[source]
        source: DecodeError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
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

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::HttpStatus { .. } => ErrorCategory::Network,
            Self::SerializationError(_) | Self::Decode { .. } | Self::UnknownServiceCode { .. } => {
                ErrorCategory::Data
            }
            Self::IoError(_) => ErrorCategory::Storage,
            Self::InvalidPattern(_)
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ApiError(_) => ErrorSeverity::Medium,
            Self::HttpStatus { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            Self::HttpStatus { .. }
            | Self::SerializationError(_)
            | Self::Decode { .. }
            | Self::UnknownServiceCode { .. } => ErrorSeverity::High,
            Self::IoError(_)
            | Self::InvalidPattern(_)
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) | Self::HttpStatus { .. } => {
                "Check network connectivity and that the store locator endpoints are reachable, then retry"
            }
            Self::SerializationError(_) => {
                "The upstream JSON no longer matches the expected shape; inspect the raw response"
            }
            Self::Decode { .. } => {
                "The store list and the attribute dictionary disagree; re-fetch both documents together"
            }
            Self::UnknownServiceCode { .. } => {
                "List the services dictionary codes and pick one that exists"
            }
            Self::IoError(_) => "Check that the output directory is writable",
            Self::InvalidPattern(_) => "Fix the regular expression syntax of the services pattern",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Review the configuration values and try again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download store data: {}", self),
            ErrorCategory::Data => format!("Store data is inconsistent: {}", self),
            ErrorCategory::Storage => format!("Could not write the output file: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
