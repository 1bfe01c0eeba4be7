//! Error types for page-bundler
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (Fetch, Resolution, Archive)
//! - HTTP status code mapping for API integration
//! - The flat JSON error body returned by the download endpoint

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for page-bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for page-bundler
///
/// Per-asset failures never surface here; they are recorded as
/// [`AssetResult::Failure`](crate::types::AssetResult::Failure) and the bundle
/// is still produced. Only failures that prevent a bundle from being built end
/// up as an `Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed request input
    #[error("{0}")]
    Validation(String),

    /// Retrieving a URL failed (fatal when it is the primary document)
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A reference or base URL could not be resolved
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Serializing the archive failed
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "PORT")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Failure retrieving a single URL
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS, connection, timeout or body read failure
    #[error("failed to fetch {url}: {reason}")]
    Transport {
        /// The URL being fetched
        url: String,
        /// Human-readable cause
        reason: String,
        /// The request timed out
        timeout: bool,
        /// The connection could not be established
        connect: bool,
    },

    /// The server answered with a non-success status
    #[error("request to {url} failed with status code {status}")]
    Status {
        /// The URL being fetched
        url: String,
        /// HTTP status code returned by the server
        status: u16,
    },

    /// The HTTP client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Build a transport error from a reqwest failure, keeping its classification
    pub fn transport(url: impl Into<String>, err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        FetchError::Transport {
            url: url.into(),
            reason,
            timeout: err.is_timeout(),
            connect: err.is_connect(),
        }
    }
}

/// Failure turning a reference into an absolute URL
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The base document URL is not a well-formed absolute URL
    #[error("invalid base URL '{base}': {reason}")]
    InvalidBase {
        /// The offending base URL
        base: String,
        /// Parser message
        reason: String,
    },

    /// The reference cannot be joined onto the base
    #[error("cannot resolve '{reference}' against {base}: {reason}")]
    InvalidReference {
        /// Raw reference found in the markup
        reference: String,
        /// Base URL used for resolution
        base: String,
        /// Parser message
        reason: String,
    },

    /// The reference resolved to something that is not fetchable over HTTP
    #[error("unsupported scheme '{scheme}' in {url}")]
    UnsupportedScheme {
        /// The resolved URL
        url: String,
        /// Its scheme
        scheme: String,
    },
}

/// Failure serializing the archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The zip writer rejected an entry or failed to finish
    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Writing entry bytes failed
    #[error("failed to write archive entry: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking serialization task panicked or was cancelled
    #[error("archive task failed: {0}")]
    Task(String),
}

/// API error response format
///
/// Returned by the download endpoint when a request cannot be served.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": "Failed to process the URL.",
///   "details": "request to https://example.com/ failed with status code 404"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable summary
    pub error: String,

    /// Underlying cause, present for pipeline failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Summary used for every fatal pipeline failure
pub const PIPELINE_FAILURE_SUMMARY: &str = "Failed to process the URL.";

impl ApiError {
    /// Create an error without details
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Create an error carrying the underlying cause
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    /// Create a pipeline failure error with the given cause
    pub fn pipeline(cause: impl Into<String>) -> Self {
        Self::with_details(PIPELINE_FAILURE_SUMMARY, cause)
    }
}

/// Convert errors to HTTP status codes for API responses
///
/// This trait maps domain errors to appropriate HTTP status codes.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Validation(_) => 400,

            // 500 Internal Server Error - the pipeline could not produce a bundle
            Error::Fetch(_) => 500,
            Error::Resolution(_) => 500,
            Error::Archive(_) => 500,
            Error::Config { .. } => 500,
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::Fetch(e) => match e {
                FetchError::Transport { .. } => "fetch_failed",
                FetchError::Status { .. } => "fetch_status",
                FetchError::Client(_) => "http_client_error",
            },
            Error::Resolution(_) => "resolution_error",
            Error::Archive(_) => "archive_error",
            Error::Config { .. } => "config_error",
            Error::Io(_) => "io_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        match error {
            Error::Validation(message) => ApiError::validation(message),
            other => ApiError::pipeline(other.to_string()),
        }
    }
}
