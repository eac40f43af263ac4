//! Interpretation of DOI service response bodies.
//!
//! The metadata service confirms a registration with a body of the exact
//! form `OK (<doi>)`. Anything else it sends back with a 2xx status is a
//! refusal whose text the caller may want to show, so it is returned as
//! data rather than raised.

/// Literal that opens a successful metadata registration body.
pub const OK_PREFIX: &str = "OK (";

/// Literal that closes a successful metadata registration body.
pub const OK_SUFFIX: &str = ")";

/// Result of a metadata registration the service answered with 2xx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataOutcome {
    /// The service confirmed the registration and reported the DOI.
    Registered {
        /// DOI extracted from the `OK (<doi>)` body.
        doi: String,
    },

    /// The service answered but did not confirm; `body` is verbatim.
    Rejected {
        /// Raw response body.
        body: String,
    },
}

impl MetadataOutcome {
    /// Returns the DOI for a confirmed registration.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        match self {
            Self::Registered { doi } => Some(doi),
            Self::Rejected { .. } => None,
        }
    }

    /// Returns true for [`MetadataOutcome::Registered`].
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        matches!(self, Self::Registered { .. })
    }
}

/// Interprets a metadata registration response body.
///
/// Trailing line terminators are ignored; every other character must match
/// the `OK (<doi>)` form.
///
/// # Examples
///
/// ```
/// use doi_client::{interpret_metadata_response, MetadataOutcome};
///
/// assert_eq!(
///     interpret_metadata_response("OK (10.5072/ABCD-1234)"),
///     MetadataOutcome::Registered { doi: "10.5072/ABCD-1234".to_string() }
/// );
/// assert_eq!(
///     interpret_metadata_response("error: duplicate DOI"),
///     MetadataOutcome::Rejected { body: "error: duplicate DOI".to_string() }
/// );
/// ```
#[must_use]
pub fn interpret_metadata_response(body: &str) -> MetadataOutcome {
    parse_ok_body(body).map_or_else(
        || MetadataOutcome::Rejected {
            body: body.to_string(),
        },
        |doi| MetadataOutcome::Registered {
            doi: doi.to_string(),
        },
    )
}

/// Extracts `<doi>` from an `OK (<doi>)` body.
#[must_use]
pub fn parse_ok_body(body: &str) -> Option<&str> {
    body.trim_end_matches(['\r', '\n'])
        .strip_prefix(OK_PREFIX)?
        .strip_suffix(OK_SUFFIX)
}
