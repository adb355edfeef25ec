//! Configuration error types and conversions.

use castellan_core::error::CastellanError;
use thiserror::Error;

/// A configuration value that decoded correctly but is not acceptable.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("path {path} is not found in configuration")]
    NotFound { path: String },

    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to decode {path}: {message}")]
    Decode { path: String, message: String },

    #[error("unrecognized field {field} in {path}")]
    UnknownField { path: String, field: String },

    #[error("invalid configuration at {path}: {source}")]
    Validation {
        path: String,
        #[source]
        source: ValidationError,
    },
}

impl From<ConfigError> for CastellanError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { path, source } => CastellanError::Validation {
                message: format!("{path}: {source}"),
            },
            other => CastellanError::Config(other.to_string()),
        }
    }
}
