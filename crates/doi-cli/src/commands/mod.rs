//! CLI commands and argument parsing.

pub mod check_config;
pub mod deactivate;
pub mod mint;
pub mod register_url;
pub mod service;

use clap::{Parser, Subcommand};

/// DOI - lifecycle client for a DataCite-style DOI registry
#[derive(Parser)]
#[command(name = "doi")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Register metadata, minting a new DOI unless one is given
    Mint(mint::MintArgs),

    /// Bind a DOI to its landing page
    RegisterUrl(register_url::RegisterUrlArgs),

    /// Mark a DOI inactive
    Deactivate(deactivate::DeactivateArgs),

    /// Validate and print the resolved configuration
    CheckConfig(check_config::CheckConfigArgs),

    /// Print version information
    Version,
}
