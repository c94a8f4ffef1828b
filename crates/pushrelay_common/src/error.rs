// --- File: crates/pushrelay_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Pushrelay errors.
///
/// This enum provides a common set of error variants that can be used across
/// all crates. Each crate can extend this by implementing
/// From<SpecificError> for GatewayError.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during authentication or authorization
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for GatewayError {
    fn status_code(&self) -> u16 {
        match self {
            GatewayError::HttpError(_) => 500,
            GatewayError::ParseError(_) => 400,
            GatewayError::ConfigError(_) => 500,
            GatewayError::AuthError(_) => 401,
            GatewayError::ValidationError(_) => 400,
            GatewayError::ExternalServiceError { .. } => 502,
            GatewayError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> GatewayError {
    GatewayError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> GatewayError {
    GatewayError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> GatewayError {
    GatewayError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> GatewayError {
    GatewayError::InternalError(message.to_string())
}
