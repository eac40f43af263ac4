//! Check-config command implementation.
//!
//! Resolves and validates the service configuration without contacting the
//! registry.

use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;

use doi_core::{ServiceConfig, Validate};

use super::service::ServiceArgs;

/// Arguments for the check-config command.
#[derive(Args)]
pub struct CheckConfigArgs {
    #[command(flatten)]
    pub service: ServiceArgs,
}

/// Runs the check-config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is invalid.
pub fn run(args: &CheckConfigArgs) -> Result<()> {
    let config = args.service.resolve()?;

    print!("{}", render(&config));
    println!();

    if let Err(errors) = config.validate() {
        println!("Configuration errors:");
        for error in errors.iter() {
            println!("  ✗ {error}");
        }
        anyhow::bail!("Configuration is invalid ({} errors)", errors.len());
    }

    println!("✓ Configuration is valid");
    Ok(())
}

/// Renders the resolved configuration with the password masked.
fn render(config: &ServiceConfig) -> String {
    let password = if config.credentials.password.is_empty() {
        "(not set)"
    } else {
        "********"
    };

    let mut out = String::new();
    let _ = writeln!(out, "DOI Service Configuration:");
    let _ = writeln!(out, "  Metadata host: {}", config.metadata_base());
    let _ = writeln!(out, "  DOI host:      {}", config.doi_base());
    let _ = writeln!(out, "  Prefix:        {}", config.prefix);
    let _ = writeln!(out, "  Username:      {}", config.credentials.username);
    let _ = writeln!(out, "  Password:      {password}");
    let _ = writeln!(out, "  Timeout:       {}s", config.timeout.as_secs());
    let _ = writeln!(out, "  User agent:    {}", config.user_agent);
    out
}
