//! Service configuration for the DOI registry endpoints.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use url::Url;

use crate::error::{Error, Result};
use crate::validation::{Validate, ValidationError, ValidationErrors};

/// Default request timeout for every registry call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection settings for the DOI registry.
///
/// The registry exposes two endpoints: the metadata service, which accepts
/// descriptive XML and deactivation requests, and the DOI service, which
/// binds a DOI to its landing page URL.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the metadata endpoint (e.g. `https://mds.example.org/metadata`).
    #[serde(default)]
    pub metadata_host: String,

    /// Base URL of the DOI endpoint (e.g. `https://mds.example.org/doi`).
    #[serde(default)]
    pub doi_host: String,

    /// Basic-auth credentials used on every call.
    #[serde(flatten)]
    pub credentials: Credentials,

    /// Registry-assigned DOI prefix (e.g. `10.5072`).
    #[serde(default)]
    pub prefix: String,

    /// Scheme to assume when a host is configured without one.
    #[serde(default = "default_use_https")]
    pub use_https: bool,

    /// Request timeout.
    #[serde(
        default = "default_timeout",
        rename = "timeout_secs",
        deserialize_with = "deserialize_secs"
    )]
    pub timeout: Duration,

    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ServiceConfig {
    /// Creates a configuration with the given endpoints and prefix.
    ///
    /// Credentials start out empty and must be set with
    /// [`with_credentials`](Self::with_credentials) before the configuration
    /// validates.
    ///
    /// # Examples
    ///
    /// ```
    /// use doi_core::ServiceConfig;
    ///
    /// let config = ServiceConfig::new("mds.example.org/metadata/", "mds.example.org/doi", "10.5072")
    ///     .with_credentials("user", "secret");
    ///
    /// assert_eq!(config.metadata_url("10.5072"), "https://mds.example.org/metadata/10.5072");
    /// assert_eq!(config.doi_url("10.5072/X"), "https://mds.example.org/doi/10.5072/X");
    /// ```
    #[must_use]
    pub fn new(
        metadata_host: impl Into<String>,
        doi_host: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            metadata_host: metadata_host.into(),
            doi_host: doi_host.into(),
            credentials: Credentials::default(),
            prefix: prefix.into(),
            use_https: default_use_https(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }

    /// Sets the basic-auth credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Credentials::new(username, password);
        self
    }

    /// Sets the scheme used for hosts configured without one.
    #[must_use]
    pub const fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Parses a configuration from YAML.
    ///
    /// Missing fields are not a parse error; they are reported by
    /// [`Validate::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if the YAML is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigLoad`] if the file cannot be read, or
    /// [`Error::ConfigParse`] if it is malformed.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Validates the configuration, converting failures into [`Error`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] listing every problem found.
    pub fn ensure_valid(&self) -> Result<()> {
        self.validate().map_err(Error::from)
    }

    /// Returns the normalized metadata endpoint base URL.
    #[must_use]
    pub fn metadata_base(&self) -> String {
        normalize_host(&self.metadata_host, self.use_https)
    }

    /// Returns the normalized DOI endpoint base URL.
    #[must_use]
    pub fn doi_base(&self) -> String {
        normalize_host(&self.doi_host, self.use_https)
    }

    /// Returns `{metadata_host}/{slug}`.
    ///
    /// Each `/`-separated segment of `slug` is percent-encoded, so a DOI
    /// containing `#`, `?` or spaces still addresses that DOI.
    #[must_use]
    pub fn metadata_url(&self, slug: &str) -> String {
        join_path(&self.metadata_base(), slug)
    }

    /// Returns `{doi_host}/{doi}`, percent-encoded like
    /// [`metadata_url`](Self::metadata_url).
    #[must_use]
    pub fn doi_url(&self, doi: &str) -> String {
        join_path(&self.doi_base(), doi)
    }
}

/// Appends the `/`-separated segments of `path` to `base`, encoding each.
fn join_path(base: &str, path: &str) -> String {
    let Ok(mut url) = Url::parse(base) else {
        return format!("{base}/{path}");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(path.split('/'));
    }
    url.into()
}

impl Validate for ServiceConfig {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (field, host) in [
            ("metadata_host", &self.metadata_host),
            ("doi_host", &self.doi_host),
        ] {
            if host.trim().is_empty() {
                errors.add(ValidationError::required(field));
                continue;
            }
            let normalized = normalize_host(host, self.use_https);
            match Url::parse(&normalized) {
                Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
                Ok(url) => errors.add(ValidationError::format(
                    field,
                    format!("unsupported URL '{normalized}' (scheme '{}')", url.scheme()),
                )),
                Err(e) => errors.add(ValidationError::format(
                    field,
                    format!("'{normalized}' is not a valid URL: {e}"),
                )),
            }
        }

        errors.require("username", &self.credentials.username);
        errors.require("password", &self.credentials.password);
        errors.require("prefix", &self.prefix);

        if self.timeout.is_zero() {
            errors.add(ValidationError::constraint(
                "timeout_secs",
                "timeout must be greater than zero",
            ));
        } else if self.timeout > DEFAULT_TIMEOUT {
            errors.add(ValidationError::constraint(
                "timeout_secs",
                format!(
                    "timeout must not exceed {} seconds",
                    DEFAULT_TIMEOUT.as_secs()
                ),
            ));
        }

        errors.into_result()
    }
}

/// Basic-auth credential pair.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Registry account username.
    #[serde(default)]
    pub username: String,

    /// Registry account password.
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Trims a host, strips trailing slashes and adds a scheme if missing.
///
/// # Examples
///
/// ```
/// use doi_core::config::normalize_host;
///
/// assert_eq!(normalize_host("mds.example.org/", true), "https://mds.example.org");
/// assert_eq!(normalize_host("mds.example.org", false), "http://mds.example.org");
/// assert_eq!(normalize_host("http://localhost:8080//", true), "http://localhost:8080");
/// ```
#[must_use]
pub fn normalize_host(host: &str, use_https: bool) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else if use_https {
        format!("https://{host}")
    } else {
        format!("http://{host}")
    }
}

const fn default_use_https() -> bool {
    true
}

const fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_user_agent() -> String {
    format!("doi-client/{}", env!("CARGO_PKG_VERSION"))
}

fn deserialize_secs<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}
