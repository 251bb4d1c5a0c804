// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! Each variant tells the story of what went wrong and where, enabling
//! composable recovery strategies: the retry policy consumes
//! `ApiErrorCode`, the materializer absorbs subtree failures, and the
//! caller sees exactly one typed root cause.

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Instead of matching against magic strings like `"rate_limited"`,
/// the domain vocabulary is encoded in the type system. Each variant
/// tells you exactly what the API reported and enables pattern-based
/// recovery without stringly-typed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// API rate limit exceeded — back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// Token is invalid or expired
    Unauthorized,
    /// Token lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed the API's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Remote internal server error
    InternalError,
    /// The service is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl ApiErrorCode {
    /// Parse an API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            429 => Self::RateLimited,
            _ => Self::HttpStatus(status),
        }
    }

    /// Whether this error is transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError
        ) || matches!(self, Self::HttpStatus(status) if *status >= 500)
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound)
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
///
/// Immutable once constructed. The transport builds `Api` variants from
/// non-2xx responses; everything deeper either propagates or absorbs them.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("No credential connected for this identity: {0}")]
    NotConnected(String),

    #[error("API returned an error ({status} {code}): {message}")]
    Api {
        status: u16,
        code: ApiErrorCode,
        message: String,
        /// Seconds the server asked us to wait, from `Retry-After`.
        retry_after: Option<u64>,
    },

    #[error("Network failure: {0}")]
    Transport(String),

    #[error("Deadline exceeded while waiting on the API")]
    DeadlineExceeded,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AppError {
    /// Constructs the typed API error for a non-2xx response.
    ///
    /// The body is expected to carry `{code, message}`; when it doesn't,
    /// the HTTP status stands in for the code and a body preview becomes
    /// the message.
    pub fn from_response(status: u16, body: &str, retry_after: Option<u64>) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            code: String,
            message: String,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => AppError::Api {
                status,
                code: ApiErrorCode::from_api_response(&parsed.code),
                message: parsed.message,
                retry_after,
            },
            Err(_) => AppError::Api {
                status,
                code: ApiErrorCode::from_http_status(status),
                message: preview(body),
                retry_after,
            },
        }
    }

    /// Whether this failure came from the remote service as opposed to
    /// local validation or configuration.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Transport(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Maximum characters shown when previewing error response bodies.
const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

fn preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "(empty response body)".to_string();
    }
    let mut end = ERROR_BODY_PREVIEW_LENGTH.min(trimmed.len());
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}

/// Validation failures for locally constructed values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    #[error("Invalid access token: {reason}")]
    InvalidToken { reason: String },
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
