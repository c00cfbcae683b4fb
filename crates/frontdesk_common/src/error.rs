// --- File: crates/frontdesk_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The error every handler returns.
///
/// Feature crates keep their own error enums; handlers map them onto these
/// variants with the helper constructors below.
#[derive(Error, Debug)]
pub enum FrontdeskError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during authentication against an upstream API
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The request was malformed or incomplete
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// The resource changed underneath the caller
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// A feature is switched off in the running configuration
    #[error("Unavailable: {0}")]
    UnavailableError(String),

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for FrontdeskError {
    fn status_code(&self) -> u16 {
        match self {
            FrontdeskError::HttpError(_) => 500,
            FrontdeskError::ConfigError(_) => 500,
            FrontdeskError::AuthError(_) => 500,
            FrontdeskError::ValidationError(_) => 400,
            FrontdeskError::ExternalServiceError { .. } => 500,
            FrontdeskError::ConflictError(_) => 409,
            FrontdeskError::NotFoundError(_) => 404,
            FrontdeskError::UnavailableError(_) => 503,
            FrontdeskError::TimeoutError(_) => 500,
            FrontdeskError::InternalError(_) => 500,
        }
    }
}

impl FrontdeskError {
    /// Message that is safe to show to the caller. Client errors carry their
    /// own wording; upstream and internal failures collapse to a generic text
    /// so no dependency detail leaks.
    pub fn public_message(&self) -> String {
        match self {
            FrontdeskError::ValidationError(message)
            | FrontdeskError::ConflictError(message)
            | FrontdeskError::NotFoundError(message)
            | FrontdeskError::UnavailableError(message) => message.clone(),
            _ => "Internal Server Error".to_string(),
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for FrontdeskError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FrontdeskError::TimeoutError(err.to_string())
        } else {
            FrontdeskError::HttpError(err.to_string())
        }
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> FrontdeskError {
    FrontdeskError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> FrontdeskError {
    FrontdeskError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> FrontdeskError {
    FrontdeskError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> FrontdeskError {
    FrontdeskError::ConflictError(message.to_string())
}

pub fn unavailable<T: fmt::Display>(message: T) -> FrontdeskError {
    FrontdeskError::UnavailableError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> FrontdeskError {
    FrontdeskError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> FrontdeskError {
    FrontdeskError::InternalError(message.to_string())
}
