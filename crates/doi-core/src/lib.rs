//! # DOI Core
//!
//! Core types for minting, updating and deactivating DOIs against a DOI
//! registry.
//!
//! This crate provides the data model shared by the client and CLI:
//!
//! - [`DoiIdentifier`] - a registry prefix and, once minted, the full DOI
//! - [`ServiceConfig`] - registry endpoints, credentials and transport settings
//! - [`EntityFields`] - narrow field access to the repository object that owns a DOI
//! - [`validation`] - collect-all-errors validation used for configuration
//!
//! ## Example
//!
//! ```rust
//! use doi_core::{DoiIdentifier, ServiceConfig, Validate};
//!
//! let config = ServiceConfig::new("mds.example.org/metadata", "mds.example.org/doi", "10.5072")
//!     .with_credentials("user", "secret");
//! assert!(config.is_valid());
//!
//! // Before minting, metadata is registered against the bare prefix.
//! let id = DoiIdentifier::new(&config.prefix)?;
//! assert_eq!(
//!     config.metadata_url(id.registration_slug()),
//!     "https://mds.example.org/metadata/10.5072"
//! );
//! # Ok::<(), doi_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod identifier;
pub mod store;
pub mod validation;


pub use config::{Credentials, ServiceConfig, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
pub use identifier::DoiIdentifier;
pub use store::{EntityFields, InMemoryEntity};
pub use validation::{Validate, ValidationError, ValidationErrors};
