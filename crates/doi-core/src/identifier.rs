//! The DOI identifier value object.
//!
//! A [`DoiIdentifier`] starts life knowing only its registry prefix. The
//! suffix is assigned by the registry when metadata is first registered, at
//! which point the full DOI (`prefix/suffix`) is stored as the identifier's
//! value. Deactivating a DOI never clears the value.

use std::fmt;

use crate::error::{Error, Result};

/// A DOI and the registry prefix it lives under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DoiIdentifier {
    prefix: String,
    value: Option<String>,
}

impl DoiIdentifier {
    /// Creates an unminted identifier for the given prefix.
    ///
    /// Surrounding whitespace and trailing slashes are stripped from the
    /// prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPrefix`] if the prefix is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use doi_core::DoiIdentifier;
    ///
    /// let id = DoiIdentifier::new("10.5072")?;
    /// assert_eq!(id.prefix(), "10.5072");
    /// assert!(id.value().is_none());
    /// assert_eq!(id.registration_slug(), "10.5072");
    /// # Ok::<(), doi_core::Error>(())
    /// ```
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = normalize_prefix(&prefix.into());
        if prefix.is_empty() {
            return Err(Error::EmptyPrefix);
        }

        Ok(Self {
            prefix,
            value: None,
        })
    }

    /// Creates an identifier from a prefix and a possibly-stored DOI.
    ///
    /// A blank `value` is treated as "not minted yet", matching how an empty
    /// identifier field reads back from storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPrefix`] for a blank prefix, or
    /// [`Error::PrefixMismatch`] if `value` is not under `prefix/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use doi_core::DoiIdentifier;
    ///
    /// let id = DoiIdentifier::existing("10.5072", Some("10.5072/ABCD-1234"))?;
    /// assert_eq!(id.value(), Some("10.5072/ABCD-1234"));
    /// assert_eq!(id.registration_slug(), "10.5072/ABCD-1234");
    ///
    /// let blank = DoiIdentifier::existing("10.5072", Some(""))?;
    /// assert!(!blank.is_minted());
    /// # Ok::<(), doi_core::Error>(())
    /// ```
    pub fn existing(prefix: impl Into<String>, value: Option<&str>) -> Result<Self> {
        let mut id = Self::new(prefix)?;
        if let Some(doi) = value.map(str::trim).filter(|v| !v.is_empty()) {
            id.assign(doi)?;
        }
        Ok(id)
    }

    /// Returns the registry prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the full DOI, if one has been minted.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns true once the registry has assigned a DOI.
    #[must_use]
    pub const fn is_minted(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the path segment used for metadata registration.
    ///
    /// An existing DOI updates that DOI's metadata; the bare prefix asks the
    /// registry to assign a new suffix.
    #[must_use]
    pub fn registration_slug(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.prefix)
    }

    /// Returns the DOI or a precondition error naming `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDoi`] if no DOI has been minted.
    pub fn require_value(&self, operation: &'static str) -> Result<&str> {
        self.value().ok_or(Error::MissingDoi { operation })
    }

    /// Stores a registry-assigned DOI, replacing any previous value.
    ///
    /// Only a successful metadata registration should call this.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PrefixMismatch`] if `doi` is not under this
    /// identifier's prefix. The identifier is left unchanged in that case.
    pub fn assign(&mut self, doi: impl Into<String>) -> Result<()> {
        let doi = doi.into();
        if !belongs_to_prefix(&doi, &self.prefix) {
            return Err(Error::PrefixMismatch {
                doi,
                prefix: self.prefix.clone(),
            });
        }
        self.value = Some(doi);
        Ok(())
    }
}

impl fmt::Display for DoiIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(doi) => write!(f, "{doi}"),
            None => write!(f, "{}/<unassigned>", self.prefix),
        }
    }
}

/// Returns true if `doi` is `prefix/` followed by a non-empty suffix.
///
/// # Examples
///
/// ```
/// use doi_core::identifier::belongs_to_prefix;
///
/// assert!(belongs_to_prefix("10.5072/ABCD-1234", "10.5072"));
/// assert!(!belongs_to_prefix("10.50721/ABCD", "10.5072"));
/// assert!(!belongs_to_prefix("10.5072/", "10.5072"));
/// ```
#[must_use]
pub fn belongs_to_prefix(doi: &str, prefix: &str) -> bool {
    doi.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|suffix| !suffix.is_empty())
}

fn normalize_prefix(prefix: &str) -> String {
    prefix.trim().trim_end_matches('/').to_string()
}
