//! Hearth CLI - Database migrations and stored cart maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! hearth-cli migrate storefront
//!
//! # Inspect a user's persisted cart and wishlist
//! hearth-cli storage show user_123
//!
//! # Delete a user's persisted cart and wishlist
//! hearth-cli storage clear user_123
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `storage` - Inspect or clear durable per-user storage

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "hearth-cli")]
#[command(author, version, about = "Hearth CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Inspect or clear a user's persisted cart and wishlist
    Storage {
        #[command(subcommand)]
        action: StorageAction,
    },
}

#[derive(Debug, Subcommand)]
enum MigrateTarget {
    /// Run storefront database migrations (including the session table)
    Storefront,
}

#[derive(Debug, Subcommand)]
enum StorageAction {
    /// Print the stored cart and wishlist
    Show {
        /// User ID as recorded by the identity provider
        user: String,
    },
    /// Delete the stored cart and wishlist
    Clear {
        /// User ID as recorded by the identity provider
        user: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Storefront => commands::migrate::storefront().await?,
        },
        Commands::Storage { action } => match action {
            StorageAction::Show { user } => commands::storage::show(&user).await?,
            StorageAction::Clear { user } => commands::storage::clear(&user).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_storage_show() {
        let cli = Cli::try_parse_from(["hearth-cli", "storage", "show", "user_123"]).unwrap();

        assert!(matches!(
            cli.command,
            Commands::Storage { action: StorageAction::Show { user } } if user == "user_123"
        ));
    }

    #[test]
    fn test_parse_migrate() {
        let cli = Cli::try_parse_from(["hearth-cli", "migrate", "storefront"]).unwrap();

        assert!(matches!(
            cli.command,
            Commands::Migrate { target: MigrateTarget::Storefront }
        ));
    }

    #[test]
    fn test_storage_requires_user() {
        assert!(Cli::try_parse_from(["hearth-cli", "storage", "clear"]).is_err());
    }
}
