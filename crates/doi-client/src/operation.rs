//! The three DOI service operations as one composable type.
//!
//! Each [`Operation`] knows its verb, target URI, content type, body and how
//! its response should be read. [`Operation::to_request`] turns it into a
//! [`DoiRequest`] against a [`ServiceConfig`].

use doi_core::{DoiIdentifier, ServiceConfig};
use reqwest::Method;

use crate::response::{interpret_metadata_response, MetadataOutcome};
use crate::transport::DoiRequest;

/// Content type for metadata registration.
pub const XML_CONTENT_TYPE: &str = "application/xml;charset=UTF-8";

/// Content type for URL registration and deactivation.
pub const TEXT_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

/// A single DOI service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation<'a> {
    /// Create or replace the descriptive metadata for a DOI.
    ///
    /// Against a bare prefix this asks the registry to assign a new suffix.
    RegisterMetadata {
        /// Prefix, or the DOI whose metadata is replaced.
        slug: &'a str,
        /// XML metadata document, sent unmodified.
        xml: &'a str,
    },

    /// Bind a minted DOI to its landing page.
    RegisterUrl {
        /// The DOI.
        doi: &'a str,
        /// Landing page URL.
        url: &'a str,
    },

    /// Mark a minted DOI inactive.
    ///
    /// The registry reactivates the DOI on the next successful metadata
    /// registration for it.
    Deactivate {
        /// The DOI.
        doi: &'a str,
    },
}

/// How an operation's 2xx response body is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// Metadata registration result.
    Metadata(MetadataOutcome),
    /// Raw body for operations whose success is the status code alone.
    Body(String),
}

impl<'a> Operation<'a> {
    /// Metadata registration for `identifier`.
    #[must_use]
    pub fn register_metadata(identifier: &'a DoiIdentifier, xml: &'a str) -> Self {
        Self::RegisterMetadata {
            slug: identifier.registration_slug(),
            xml,
        }
    }

    /// URL registration for a minted `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`doi_core::Error::MissingDoi`] if no DOI has been minted.
    pub fn register_url(identifier: &'a DoiIdentifier, url: &'a str) -> doi_core::Result<Self> {
        let doi = identifier.require_value("register-url")?;
        Ok(Self::RegisterUrl { doi, url })
    }

    /// Deactivation of a minted `identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`doi_core::Error::MissingDoi`] if no DOI has been minted.
    pub fn deactivate(identifier: &'a DoiIdentifier) -> doi_core::Result<Self> {
        let doi = identifier.require_value("deactivate")?;
        Ok(Self::Deactivate { doi })
    }

    /// Short operation name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RegisterMetadata { .. } => "register-metadata",
            Self::RegisterUrl { .. } => "register-url",
            Self::Deactivate { .. } => "deactivate",
        }
    }

    /// The DOI or prefix this operation targets.
    #[must_use]
    pub const fn target(&self) -> &'a str {
        match self {
            Self::RegisterMetadata { slug, .. } => *slug,
            Self::RegisterUrl { doi, .. } | Self::Deactivate { doi } => *doi,
        }
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::RegisterMetadata { .. } | Self::RegisterUrl { .. } => Method::PUT,
            Self::Deactivate { .. } => Method::DELETE,
        }
    }

    /// `Content-Type` header value.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::RegisterMetadata { .. } => XML_CONTENT_TYPE,
            Self::RegisterUrl { .. } | Self::Deactivate { .. } => TEXT_CONTENT_TYPE,
        }
    }

    /// Target URI on the configured service.
    #[must_use]
    pub fn uri(&self, config: &ServiceConfig) -> String {
        match self {
            Self::RegisterMetadata { slug, .. } => config.metadata_url(slug),
            Self::RegisterUrl { doi, .. } => config.doi_url(doi),
            Self::Deactivate { doi } => config.metadata_url(doi),
        }
    }

    /// Request body.
    #[must_use]
    pub fn body(&self) -> Option<String> {
        match self {
            Self::RegisterMetadata { xml, .. } => Some((*xml).to_string()),
            Self::RegisterUrl { doi, url } => Some(url_registration_body(doi, url)),
            Self::Deactivate { .. } => None,
        }
    }

    /// Builds the request, with credentials from `config`.
    #[must_use]
    pub fn to_request(&self, config: &ServiceConfig) -> DoiRequest {
        DoiRequest {
            method: self.method(),
            url: self.uri(config),
            content_type: self.content_type(),
            body: self.body(),
            credentials: config.credentials.clone(),
        }
    }

    /// Reads a 2xx response body.
    #[must_use]
    pub fn interpret(&self, body: String) -> OperationOutcome {
        match self {
            Self::RegisterMetadata { .. } => {
                OperationOutcome::Metadata(interpret_metadata_response(&body))
            }
            Self::RegisterUrl { .. } | Self::Deactivate { .. } => OperationOutcome::Body(body),
        }
    }
}

/// Builds the two-line body the DOI endpoint expects.
///
/// # Examples
///
/// ```
/// use doi_client::operation::url_registration_body;
///
/// assert_eq!(
///     url_registration_body("10.5072/X", "http://example.org/obj/1"),
///     "doi=10.5072/X\nurl=http://example.org/obj/1\n"
/// );
/// ```
#[must_use]
pub fn url_registration_body(doi: &str, url: &str) -> String {
    format!("doi={doi}\nurl={url}\n")
}
