//! Typed errors for the finder library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can end a finder run before it starts.
///
/// Nothing that happens after validation is fatal: probe failures become
/// `NotFound` verdicts and delivery failures are logged and dropped.
#[derive(Debug, Error)]
pub enum FinderError {
    /// Query token is empty or contains characters outside `[A-Za-z0-9-]`
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },

    /// Configuration rejected by [`FinderConfig::validate`](crate::FinderConfig::validate)
    #[error("config error: {reason}")]
    Config { reason: String },

    /// The HTTP transport could not be built
    #[error("transport setup failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FinderError {
    pub(crate) fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

/// Network-level failures of a single probe.
///
/// The probe worker never surfaces these; they are logged at debug level
/// and downgraded to [`ProbeVerdict::NotFound`](crate::ProbeVerdict::NotFound).
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Connection or protocol failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request exceeded the configured timeout
    #[error("timeout probing: {url}")]
    Timeout { url: String },

    /// Response body could not be read or decoded
    #[error("body decode failed for {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Failures of the chat collaborators (progress and batch delivery).
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The message never reached the chat platform
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The chat platform refused the message (too long, chat gone, ...)
    #[error("message rejected: {reason}")]
    Rejected { reason: String },
}

/// Result type alias for finder operations.
pub type Result<T> = std::result::Result<T, FinderError>;

/// Result type alias for single-probe network operations.
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// Result type alias for chat delivery operations.
pub type DeliveryResult<T> = std::result::Result<T, DeliveryError>;
