//! Error types for DOI core operations.
//!
//! Everything in this module is a configuration or precondition failure:
//! it is raised before any request leaves the process.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in DOI core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The service configuration is incomplete or malformed.
    #[error("Invalid service configuration: {0}")]
    InvalidConfiguration(ValidationErrors),

    /// An operation requires an already-minted DOI but none is set.
    #[error("Operation '{operation}' requires an existing DOI but none is set")]
    MissingDoi {
        /// Name of the operation that was attempted.
        operation: &'static str,
    },

    /// A DOI value does not belong to the configured prefix.
    #[error("DOI '{doi}' does not belong to prefix '{prefix}'")]
    PrefixMismatch {
        /// The offending DOI.
        doi: String,
        /// The configured prefix.
        prefix: String,
    },

    /// A DOI prefix was empty.
    #[error("DOI prefix must not be empty")]
    EmptyPrefix,

    /// Configuration file could not be read.
    #[error("Failed to read configuration from {}: {source}", path.display())]
    ConfigLoad {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::InvalidConfiguration(errors)
    }
}
