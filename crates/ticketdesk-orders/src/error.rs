//! Error types for order sources and the order cache.

use std::path::PathBuf;

/// Errors that can occur when loading order records.
#[derive(Debug, thiserror::Error)]
pub enum OrderSourceError {
    /// The upstream source cannot be reached or is not configured.
    #[error("source unavailable: {reason}")]
    SourceUnavailable { reason: String },

    /// The HTTP request to the upstream failed before a response arrived.
    #[error("http error: {0}")]
    Http(String),

    /// The upstream answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Credentials are missing, malformed or of an unsupported kind.
    #[error("credentials error: {0}")]
    Credentials(String),

    /// The upstream payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A timeout occurred while waiting for the upstream.
    #[error("operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// An I/O error occurred.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl OrderSourceError {
    /// Creates a new source unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new credentials error.
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Creates a new decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Creates a new I/O error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this is a transient error that might succeed on a
    /// later refresh.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::SourceUnavailable { .. } | Self::Timeout { .. } | Self::Http(_) => true,
            Self::UpstreamStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for OrderSourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest does not expose the configured duration
            Self::Http(format!("request timed out: {err}"))
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

/// Type alias for Results with OrderSourceError.
pub type Result<T> = std::result::Result<T, OrderSourceError>;
