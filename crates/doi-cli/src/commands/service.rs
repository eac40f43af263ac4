//! Registry connection arguments shared by every command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use doi_client::DoiClient;
use doi_core::ServiceConfig;

/// Registry connection settings.
///
/// Values come from an optional YAML file; flags (and their environment
/// variables) override it.
#[derive(Args, Debug, Clone, Default)]
pub struct ServiceArgs {
    /// YAML configuration file
    #[arg(long, env = "DOI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Metadata endpoint (e.g., `mds.test.datacite.org/metadata`)
    #[arg(long, env = "DOI_METADATA_HOST")]
    pub metadata_host: Option<String>,

    /// DOI endpoint (e.g., `mds.test.datacite.org/doi`)
    #[arg(long, env = "DOI_HOST")]
    pub doi_host: Option<String>,

    /// Registry account username
    #[arg(long, env = "DOI_USERNAME")]
    pub username: Option<String>,

    /// Registry account password
    #[arg(long, env = "DOI_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// DOI prefix assigned by the registry (e.g., `10.5072`)
    #[arg(long, env = "DOI_PREFIX")]
    pub prefix: Option<String>,

    /// Use https for hosts given without a scheme
    #[arg(long, env = "DOI_USE_HTTPS")]
    pub use_https: Option<bool>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ServiceArgs {
    /// Builds the service configuration from the file and flags.
    ///
    /// The result is not validated; [`DoiClient::new`] does that.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub fn resolve(&self) -> Result<ServiceConfig> {
        let mut config = match self.config {
            Some(ref path) => ServiceConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ServiceConfig::new("", "", ""),
        };

        if let Some(ref host) = self.metadata_host {
            config.metadata_host.clone_from(host);
        }
        if let Some(ref host) = self.doi_host {
            config.doi_host.clone_from(host);
        }
        if let Some(ref username) = self.username {
            config.credentials.username.clone_from(username);
        }
        if let Some(ref password) = self.password {
            config.credentials.password.clone_from(password);
        }
        if let Some(ref prefix) = self.prefix {
            config.prefix.clone_from(prefix);
        }
        if let Some(use_https) = self.use_https {
            config = config.with_https(use_https);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Resolves the configuration and builds a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is incomplete or invalid.
    pub fn client(&self) -> Result<DoiClient> {
        let config = self.resolve()?;
        DoiClient::new(config).context("Invalid DOI service configuration")
    }
}
