//! Mint command implementation.
//!
//! Registers metadata against the configured prefix (minting a new DOI) or
//! against an existing DOI (replacing its metadata), then optionally binds
//! the landing page.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use doi_audit::AuditLogger;
use doi_client::{MintDoiAction, MintPayload, MintResult};
use doi_core::{EntityFields, InMemoryEntity};

use super::service::ServiceArgs;

/// Field the CLI's one-shot entity keeps its DOI in.
const DOI_FIELD: &str = "doi";

/// Arguments for the mint command.
#[derive(Args)]
pub struct MintArgs {
    /// DataCite XML metadata file
    #[arg(long, required = true)]
    pub xml: PathBuf,

    /// Existing DOI whose metadata should be replaced
    #[arg(long)]
    pub doi: Option<String>,

    /// Landing page URL to bind the DOI to
    #[arg(long)]
    pub url: Option<String>,

    #[command(flatten)]
    pub service: ServiceArgs,
}

/// Runs the mint command.
///
/// # Errors
///
/// Returns an error if:
/// - The XML file cannot be read
/// - The configuration is invalid
/// - A request fails
/// - The registry rejects the metadata
pub async fn run(args: &MintArgs) -> Result<()> {
    let xml = read_metadata(&args.xml)?;
    let client = args.service.client()?;

    info!(xml = ?args.xml, prefix = %client.config().prefix, "Registering DOI metadata");

    let action = MintDoiAction::new(client, DOI_FIELD).with_audit(Arc::new(AuditLogger::tracing()));
    let mut entity = one_shot_entity(&args.xml, args.doi.as_deref());
    let payload = MintPayload {
        xml: &xml,
        landing_url: args.url.as_deref(),
    };

    match action
        .execute(&mut entity, payload)
        .await
        .context("Failed to register DOI metadata")?
    {
        MintResult::Minted { doi } => {
            println!("DOI minted: {doi}");
            print_landing(args.url.as_deref());
        }
        MintResult::Updated { doi } => {
            println!("DOI metadata updated: {doi}");
            print_landing(args.url.as_deref());
        }
        MintResult::Rejected { body } => {
            println!("Registry response:");
            println!("  {body}");
            anyhow::bail!("The registry did not accept the metadata");
        }
        MintResult::Skipped => anyhow::bail!("Entity type not handled"),
    }

    Ok(())
}

fn print_landing(url: Option<&str>) {
    if let Some(url) = url {
        println!("  Landing page: {url}");
    }
}

/// Reads the metadata document, refusing empty files.
fn read_metadata(path: &Path) -> Result<String> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metadata file {}", path.display()))?;
    if xml.trim().is_empty() {
        anyhow::bail!("Metadata file is empty: {}", path.display());
    }
    Ok(xml)
}

/// Wraps the command-line inputs as an entity for the mint action.
fn one_shot_entity(xml: &Path, doi: Option<&str>) -> InMemoryEntity {
    let mut entity = InMemoryEntity::new("file", xml.display().to_string());
    if let Some(doi) = doi {
        entity.set_field(DOI_FIELD, doi);
    }
    entity
}
