//! HTTP client error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// HTTP client errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Connection, DNS, timeout or URL failure raised by the transport
    #[error("Network request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be read
    #[error("Failed to read response body: {0}")]
    Decode(#[from] std::io::Error),

    /// File body could not be opened
    #[error("Failed to open request body {}: {source}", .path.display())]
    RequestBody {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Status code outside the acceptable set.
    ///
    /// Renders as `"{body} ({reason}: {status})"`. When the response had no
    /// entity the body and its trailing space are left out, giving
    /// `"({reason}: {status})"`.
    #[error("{}", request_failed_message(.body, .reason, .status))]
    RequestFailed {
        status: u16,
        reason: String,
        body: Option<String>,
    },

    /// Invalid proxy configuration
    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),
}

impl HttpError {
    /// Status code of a rejected response, if this error is one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            HttpError::RequestFailed { status, .. } => Some(*status),
            HttpError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the daemon answered with an unacceptable status
    pub fn is_request_failed(&self) -> bool {
        matches!(self, HttpError::RequestFailed { .. })
    }

    /// Check if the daemon answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, HttpError::RequestFailed { status: 404, .. })
    }
}

fn request_failed_message(body: &Option<String>, reason: &str, status: &u16) -> String {
    match body {
        Some(body) => format!("{body} ({reason}: {status})"),
        None => format!("({reason}: {status})"),
    }
}
