//! Jungle CLI - Database migrations, seeding and user management.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! jungle-cli migrate
//!
//! # Seed the built-in demo catalog, or a YAML catalog file
//! jungle-cli seed
//! jungle-cli seed --file catalog.yaml
//!
//! # Register a shopper (password from JUNGLE_USER_PASSWORD)
//! JUNGLE_USER_PASSWORD=... jungle-cli users create -f Kyle -l Doe -e kyle@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `JUNGLE_USER_PASSWORD` - Password for `users create`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "jungle-cli")]
#[command(author, version, about = "Jungle CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed categories and products
    Seed {
        /// YAML catalog file (built-in demo catalog if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Manage shopper accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
enum UsersAction {
    /// Register a new user
    Create {
        /// First name
        #[arg(short, long)]
        first_name: String,

        /// Last name
        #[arg(short, long)]
        last_name: String,

        /// Email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jungle_cli=info,jungle_storefront=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => {
            commands::seed::run(file.as_deref()).await?;
        }
        Commands::Users { action } => match action {
            UsersAction::Create {
                first_name,
                last_name,
                email,
            } => {
                commands::users::create(first_name, last_name, email).await?;
            }
        },
    }
    Ok(())
}
