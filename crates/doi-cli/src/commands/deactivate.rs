//! Deactivate command implementation.
//!
//! Marks a DOI inactive. The DOI keeps resolving; registering its metadata
//! again reactivates it.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use doi_audit::AuditLogger;
use doi_client::DeactivateDoiAction;
use doi_core::InMemoryEntity;

use super::service::ServiceArgs;

const DOI_FIELD: &str = "doi";

/// Arguments for the deactivate command.
#[derive(Args)]
pub struct DeactivateArgs {
    /// DOI to deactivate
    #[arg(long, required = true)]
    pub doi: String,

    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,

    #[command(flatten)]
    pub service: ServiceArgs,
}

/// Runs the deactivate command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the DOI is missing or
/// not under the configured prefix, or the request fails.
pub async fn run(args: &DeactivateArgs) -> Result<()> {
    let client = args.service.client()?;

    if !args.yes && !confirm(&args.doi)? {
        println!("Aborted.");
        return Ok(());
    }

    info!(doi = %args.doi, "Deactivating DOI");

    let action =
        DeactivateDoiAction::new(client, DOI_FIELD).with_audit(Arc::new(AuditLogger::tracing()));
    let entity = InMemoryEntity::new("doi", args.doi.clone()).with_field(DOI_FIELD, &args.doi);

    let body = action
        .execute(&entity)
        .await
        .context("Failed to deactivate DOI")?;

    println!("DOI set to inactive: {}", args.doi);
    println!("  Response: {body}");
    println!();
    println!("{}", reactivation_note(&args.doi));

    Ok(())
}

fn confirm(doi: &str) -> Result<bool> {
    use std::io::{self, Write};
    print!("Deactivate {doi}? [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn reactivation_note(doi: &str) -> String {
    format!(
        "Note: the DOI still resolves. Registering metadata for it again reactivates it:\n  \
         doi mint --doi {doi} --xml <metadata.xml>"
    )
}
