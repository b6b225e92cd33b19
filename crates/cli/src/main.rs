//! Aroura CLI - database migrations and catalog checks.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations (incl. the sessions table)
//! aroura-cli migrate
//!
//! # Validate the embedded catalog and print it
//! aroura-cli catalog check
//! aroura-cli catalog list
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "aroura-cli")]
#[command(author, version, about = "Aroura CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Inspect the embedded product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Validate the catalog (unique ids, positive prices)
    Check,
    /// Print the catalog as a table
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Catalog { action } => match action {
            CatalogAction::Check => commands::catalog::check()?,
            CatalogAction::List => commands::catalog::list(),
        },
    }
    Ok(())
}
