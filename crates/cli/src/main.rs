//! Dukkan CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (storefront and admin share one database)
//! dukkan migrate
//!
//! # Provision an operator account (no public admin signup exists)
//! dukkan admin create -e ops@dukkan.store -n "Mona" -p "a long passphrase" -r admin
//!
//! # Load the sample Arabic catalog into an empty database
//! dukkan seed
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dukkan")]
#[command(author, version, about = "Dukkan CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage operator accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database with a sample catalog
    Seed,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new operator account
    Create {
        /// Operator email address
        #[arg(short, long)]
        email: String,

        /// Operator display name
        #[arg(short, long)]
        name: String,

        /// Operator password (min 12 characters)
        #[arg(short, long)]
        password: String,

        /// Operator role (`super_admin`, `admin`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
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
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
                role,
            } => {
                commands::admin::create_operator(&email, &name, &password, &role).await?;
            }
        },
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}
