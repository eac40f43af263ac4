//! Error types for DOI registry operations.
//!
//! Two families of hard failure exist. Configuration errors are raised
//! before any request is sent. Transport errors cover everything between
//! sending a request and receiving a 2xx response. A registry that answers
//! 2xx but refuses a metadata registration is not an error at all; see
//! [`MetadataOutcome::Rejected`](crate::MetadataOutcome::Rejected).

use thiserror::Error;

/// Boxed error used to preserve the cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by [`DoiClient`](crate::DoiClient) operations.
#[derive(Debug, Error)]
pub enum DoiError {
    /// Missing or invalid configuration, or a missing DOI precondition.
    #[error("Configuration error: {0}")]
    Configuration(#[from] doi_core::Error),

    /// The request could not be completed or the service answered non-2xx.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl DoiError {
    /// Returns true for configuration and precondition failures.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true for transport failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true if the request timed out.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Timeout { .. }))
    }
}

/// Errors raised while talking to the DOI service.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {source}")]
    ClientBuild {
        /// Underlying error.
        #[source]
        source: BoxError,
    },

    /// Failed to connect to the service.
    #[error("Failed to connect to DOI service at {url}: {source}")]
    ConnectionFailed {
        /// Request URL.
        url: String,
        /// Underlying error.
        #[source]
        source: BoxError,
    },

    /// The request exceeded its timeout.
    #[error("Request to {url} timed out")]
    Timeout {
        /// Request URL.
        url: String,
        /// Underlying error.
        #[source]
        source: BoxError,
    },

    /// The service answered with a non-2xx status.
    #[error("DOI service returned HTTP {status} for {url}: {body}")]
    HttpStatus {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Any other request failure.
    #[error("Request to {url} failed: {source}")]
    Request {
        /// Request URL.
        url: String,
        /// Underlying error.
        #[source]
        source: BoxError,
    },
}

impl TransportError {
    /// Classifies a reqwest error raised while requesting `url`.
    #[must_use]
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            Self::Timeout {
                url,
                source: Box::new(err),
            }
        } else if err.is_connect() {
            Self::ConnectionFailed {
                url,
                source: Box::new(err),
            }
        } else {
            Self::Request {
                url,
                source: Box::new(err),
            }
        }
    }

    /// Returns the HTTP status for [`TransportError::HttpStatus`].
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
