//! Register-url command implementation.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use super::service::ServiceArgs;

/// Arguments for the register-url command.
#[derive(Args)]
pub struct RegisterUrlArgs {
    /// DOI to bind
    #[arg(long, required = true)]
    pub doi: String,

    /// Landing page URL
    #[arg(long, required = true)]
    pub url: String,

    #[command(flatten)]
    pub service: ServiceArgs,
}

/// Runs the register-url command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the DOI is not under
/// the configured prefix, or the request fails.
pub async fn run(args: &RegisterUrlArgs) -> Result<()> {
    let client = args.service.client()?;
    let doi = client
        .identifier(Some(&args.doi))
        .context("DOI does not belong to the configured prefix")?;

    info!(doi = %args.doi, url = %args.url, "Registering landing page");

    let body = client
        .register_url(&doi, &args.url)
        .await
        .context("Failed to register landing page")?;

    println!("Landing page registered for {}", args.doi);
    println!("  URL:      {}", args.url);
    println!("  Response: {body}");

    Ok(())
}
