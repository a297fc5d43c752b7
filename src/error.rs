// Error handling module
// Defines the error taxonomy for eBay API calls

use serde_json::Value;
use thiserror::Error;

/// Coarse category of an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    NotFound,
    RateLimit,
    Validation,
    ServerFault,
    Transport,
    Generic,
    Config,
    InvalidArgument,
}

/// Errors that can occur while talking to the eBay API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Credentials invalid, expired or unobtainable
    #[error("{message}")]
    AuthError {
        message: String,
        status_code: Option<u16>,
        response_body: Option<Value>,
    },

    /// 404 from the API
    #[error("{message}")]
    NotFound {
        message: String,
        status_code: u16,
        response_body: Option<Value>,
    },

    /// 429 from the API
    #[error("{message}")]
    RateLimited {
        message: String,
        status_code: u16,
        response_body: Option<Value>,
        /// Seconds to wait, from the Retry-After header
        retry_after: Option<u64>,
    },

    /// 400 or 422 from the API
    #[error("{message}")]
    ValidationError {
        message: String,
        status_code: u16,
        response_body: Option<Value>,
    },

    /// 5xx from the API
    #[error("{message}")]
    ServerError {
        message: String,
        status_code: u16,
        response_body: Option<Value>,
    },

    /// No HTTP response was obtained (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Transport(String),

    /// Any other non-2xx status
    #[error("{message}")]
    EbayApiError {
        message: String,
        status_code: u16,
        response_body: Option<Value>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Caller passed an argument the API would reject anyway
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ApiError {
    /// Auth error that did not come from an HTTP response
    pub fn auth(message: impl Into<String>) -> Self {
        ApiError::AuthError {
            message: message.into(),
            status_code: None,
            response_body: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::AuthError { .. } => ErrorKind::Auth,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::RateLimited { .. } => ErrorKind::RateLimit,
            ApiError::ValidationError { .. } => ErrorKind::Validation,
            ApiError::ServerError { .. } => ErrorKind::ServerFault,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::EbayApiError { .. } => ErrorKind::Generic,
            ApiError::ConfigError(_) => ErrorKind::Config,
            ApiError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    /// Human-readable message without any prefix
    pub fn message(&self) -> &str {
        match self {
            ApiError::AuthError { message, .. }
            | ApiError::NotFound { message, .. }
            | ApiError::RateLimited { message, .. }
            | ApiError::ValidationError { message, .. }
            | ApiError::ServerError { message, .. }
            | ApiError::EbayApiError { message, .. } => message,
            ApiError::Transport(message)
            | ApiError::ConfigError(message)
            | ApiError::InvalidArgument(message) => message,
        }
    }

    /// HTTP status that produced this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::AuthError { status_code, .. } => *status_code,
            ApiError::NotFound { status_code, .. }
            | ApiError::RateLimited { status_code, .. }
            | ApiError::ValidationError { status_code, .. }
            | ApiError::ServerError { status_code, .. }
            | ApiError::EbayApiError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Raw response payload, kept for diagnostics
    pub fn response_body(&self) -> Option<&Value> {
        match self {
            ApiError::AuthError { response_body, .. }
            | ApiError::NotFound { response_body, .. }
            | ApiError::RateLimited { response_body, .. }
            | ApiError::ValidationError { response_body, .. }
            | ApiError::ServerError { response_body, .. }
            | ApiError::EbayApiError { response_body, .. } => response_body.as_ref(),
            _ => None,
        }
    }

    /// Retry-After hint in seconds (rate limit errors only)
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
