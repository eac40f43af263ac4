//! # DOI Client
//!
//! Client for a DataCite-style DOI registry.
//!
//! The registry exposes two endpoints: a metadata service that holds the
//! descriptive XML for each DOI, and a DOI service that binds a DOI to its
//! landing page. This crate provides the three lifecycle calls against them:
//!
//! - **Metadata registration**: `PUT {metadata_host}/{prefix or doi}`; against
//!   a bare prefix the registry mints a new DOI
//! - **URL registration**: `PUT {doi_host}/{doi}`
//! - **Deactivation**: `DELETE {metadata_host}/{doi}`
//!
//! Every call uses HTTP basic auth and the configured timeout (15 seconds by
//! default).
//!
//! ## Errors
//!
//! Configuration problems are reported before any request is sent. Network
//! failures, timeouts and non-2xx statuses are [`TransportError`]s. A 2xx
//! metadata response that is not `OK (<doi>)` is not an error: it comes back
//! as [`MetadataOutcome::Rejected`] with the registry's text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doi_client::{DoiClient, MetadataOutcome};
//! use doi_core::ServiceConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::new(
//!         "mds.test.datacite.org/metadata",
//!         "mds.test.datacite.org/doi",
//!         "10.5072",
//!     )
//!     .with_credentials("DATACITE.EXAMPLE", "secret");
//!
//!     let client = DoiClient::new(config)?;
//!     let mut doi = client.identifier(None)?;
//!
//!     if let MetadataOutcome::Registered { doi: minted } =
//!         client.register_metadata(&mut doi, "<resource/>").await?
//!     {
//!         client.register_url(&doi, "https://repo.example.org/node/1").await?;
//!         println!("minted {minted}");
//!     }
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod actions;
mod client;
mod error;
pub mod operation;
pub mod response;
pub mod transport;

#[cfg(test)]
mod testing;

pub use actions::{DeactivateDoiAction, MintDoiAction, MintPayload, MintResult};
pub use client::DoiClient;
pub use error::{BoxError, DoiError, TransportError};
pub use operation::{Operation, OperationOutcome};
pub use response::{interpret_metadata_response, MetadataOutcome};
pub use transport::{basic_auth_header, DoiRequest, HttpTransport, ServiceResponse, Transport};
