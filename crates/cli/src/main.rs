//! Pampa CLI - Seeding, migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run document-table migrations (postgres backend)
//! pampa-cli migrate
//!
//! # Seed the sample catalog, or one from a JSON file
//! pampa-cli seed-products
//! pampa-cli seed-products --file productos.json
//!
//! # Write the default shipping zone table
//! pampa-cli init-shipping
//! pampa-cli init-shipping --force
//!
//! # Restore the default payment methods
//! pampa-cli reset-payments
//!
//! # Grant the admin role
//! pampa-cli admin grant --email ana@example.com
//! ```
//!
//! Backend selection follows the services: `PAMPA_BACKEND` plus
//! `PAMPA_DATABASE_URL` for postgres. The in-memory backend is accepted
//! for dry runs, with the obvious caveat that nothing persists.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pampa-cli")]
#[command(author, version, about = "Pampa CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run document-table migrations (postgres backend)
    Migrate,
    /// Seed the product catalog
    SeedProducts {
        /// JSON file with the products to seed (defaults to the sample set)
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Write the default shipping zone table
    InitShipping {
        /// Overwrite existing zone documents
        #[arg(long)]
        force: bool,
    },
    /// Restore the default payment methods
    ResetPayments,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the admin role to an existing account
    Grant {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Revoke the admin role
    Revoke {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
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
        Commands::SeedProducts { file } => commands::seed::products(file.as_deref()).await?,
        Commands::InitShipping { force } => commands::shipping::init(force).await?,
        Commands::ResetPayments => commands::payments::reset().await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { email } => commands::admin::set_role(&email, true).await?,
            AdminAction::Revoke { email } => commands::admin::set_role(&email, false).await?,
        },
    }
    Ok(())
}
