//! Bookstore CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (schema + session table)
//! bookstore-cli migrate
//!
//! # Seed users and books from YAML
//! bookstore-cli seed --file catalog.yaml
//!
//! # Create a user
//! bookstore-cli user create --id 1 --name "Ada" --email ada@example.com --role Admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed users and books
//! - `user create` - Create customer or admin accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bookstore-cli")]
#[command(author, version, about = "Bookstore CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed users and books from a YAML file
    Seed {
        /// Path to the seed file
        #[arg(short, long)]
        file: String,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Numeric user ID, used to log in
        #[arg(short, long)]
        id: i32,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Role (`Customer` or `Admin`)
        #[arg(short, long, default_value = "Customer")]
        role: String,
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
        Commands::Seed { file } => {
            commands::seed::from_file(&file).await?;
        }
        Commands::User { action } => match action {
            UserAction::Create {
                id,
                name,
                email,
                role,
            } => {
                commands::user::create(id, &name, &email, &role).await?;
            }
        },
    }
    Ok(())
}
