//! Cinema Error Types
//!
//! Centralized error handling using thiserror for type-safe errors.

use thiserror::Error;

/// Top-level error type for Cinema
#[derive(Error, Debug)]
pub enum CinemaError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Locale error: {0}")]
    Locale(#[from] LocaleError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the REST handlers
///
/// The handlers only report these; translating them into a response is the
/// router's job.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("User {id} not found")]
    NotFound { id: String },

    #[error("\"{field}\" not specified")]
    InputMissing { field: String },

    #[error("No route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error("Method {method} not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    /// HTTP status code for this error
    pub fn status(&self) -> u16 {
        match self {
            ApiError::NotFound { .. } | ApiError::RouteNotFound { .. } => 404,
            ApiError::InputMissing { .. } | ApiError::BadRequest(_) => 400,
            ApiError::MethodNotAllowed { .. } => 405,
        }
    }

    /// Stable machine-readable name
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "not_found",
            ApiError::InputMissing { .. } => "input_missing",
            ApiError::RouteNotFound { .. } => "route_not_found",
            ApiError::MethodNotAllowed { .. } => "method_not_allowed",
            ApiError::BadRequest(_) => "bad_request",
        }
    }
}

/// Locale data and translation loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Invalid language tag: {0}")]
    InvalidTag(String),

    #[error("Failed to load bundle '{bundle}': {reason}")]
    LoadFailed { bundle: String, reason: String },

    #[error("Bundle '{bundle}' is malformed: {reason}")]
    InvalidBundle { bundle: String, reason: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

/// Result type alias for Cinema operations
pub type Result<T> = std::result::Result<T, CinemaError>;

/// Result type alias for REST handler operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Result type alias for locale loading operations
pub type LocaleResult<T> = std::result::Result<T, LocaleError>;

/// Result type alias for Config operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
