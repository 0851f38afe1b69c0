use thiserror::Error;

use crate::domain::model::{Operation, Resource};

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned status {status}: {message}")]
    ApiStatusError { status: u16, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("The operation \"{operation}\" is not implemented for resource \"{resource}\"")]
    NotImplementedError {
        resource: Resource,
        operation: Operation,
    },

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value \"{value}\" for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, ConnectorError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Data,
    Config,
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConnectorError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConnectorError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_implemented(resource: Resource, operation: Operation) -> Self {
        ConnectorError::NotImplementedError {
            resource,
            operation,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ConnectorError::ApiError(_) => ErrorCategory::Network,
            ConnectorError::ApiStatusError { .. } => ErrorCategory::Api,
            ConnectorError::SerializationError(_)
            | ConnectorError::IoError(_)
            | ConnectorError::ValidationError { .. } => ErrorCategory::Data,
            ConnectorError::ConfigValidationError { .. }
            | ConnectorError::InvalidConfigValueError { .. }
            | ConnectorError::MissingConfigError { .. } => ErrorCategory::Config,
            ConnectorError::NotImplementedError { .. } => ErrorCategory::Unsupported,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ConnectorError::ApiStatusError { status, .. } if *status >= 500 => {
                ErrorSeverity::Medium
            }
            ConnectorError::ApiStatusError { .. } => ErrorSeverity::High,
            ConnectorError::ApiError(_) => ErrorSeverity::Medium,
            ConnectorError::SerializationError(_) | ConnectorError::ValidationError { .. } => {
                ErrorSeverity::High
            }
            ConnectorError::NotImplementedError { .. } => ErrorSeverity::High,
            ConnectorError::ConfigValidationError { .. }
            | ConnectorError::InvalidConfigValueError { .. }
            | ConnectorError::MissingConfigError { .. } => ErrorSeverity::Critical,
            ConnectorError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ConnectorError::ApiError(e) => format!("Could not reach the Jiandaoyun API: {}", e),
            ConnectorError::ApiStatusError { status, message } => format!(
                "The Jiandaoyun API rejected the request ({}): {}",
                status, message
            ),
            ConnectorError::NotImplementedError {
                resource,
                operation,
            } => format!(
                "\"{}\" is not supported for the \"{}\" resource",
                operation, resource
            ),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the server URL and your network connection",
            ErrorCategory::Api => "Check the API key and the request parameters",
            ErrorCategory::Data => "Check the JSON parameters passed to the operation",
            ErrorCategory::Config => "Check the connection profile (server, api_key)",
            ErrorCategory::Unsupported => "Pick one of the supported resource/operation pairs",
        }
    }
}
