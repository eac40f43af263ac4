//! DOI CLI - mint, bind and deactivate DOIs from the command line.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doi=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mint(args) => commands::mint::run(&args).await,
        Commands::RegisterUrl(args) => commands::register_url::run(&args).await,
        Commands::Deactivate(args) => commands::deactivate::run(&args).await,
        Commands::CheckConfig(args) => commands::check_config::run(&args),
        Commands::Version => {
            println!("doi {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
