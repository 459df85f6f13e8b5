//! Auto-parts CLI - database, build and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Create/upgrade the schema (tables + session store)
//! ap-cli migrate
//!
//! # Content-hash static assets into dist/public/assets and write the manifest
//! ap-cli assets build
//!
//! # Write prerendered pages, sitemap.xml and robots.txt into dist/public
//! ap-cli prerender
//!
//! # Delete expired password reset tokens
//! ap-cli tokens sweep
//!
//! # Move an order to a new status
//! ap-cli orders status 42 shipped
//!
//! # Show the newest contact-form messages
//! ap-cli messages list --limit 20
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use autoparts_core::OrderStatus;

mod commands;

#[derive(Parser)]
#[command(name = "ap-cli")]
#[command(author, version, about = "Auto-parts storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Client asset build
    Assets {
        #[command(subcommand)]
        action: AssetsAction,
    },
    /// Prerender public pages for crawlers
    Prerender,
    /// Password reset token maintenance
    Tokens {
        #[command(subcommand)]
        action: TokensAction,
    },
    /// Order management
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Contact-form messages
    Messages {
        #[command(subcommand)]
        action: MessagesAction,
    },
}

#[derive(Subcommand)]
enum AssetsAction {
    /// Hash static assets and write the manifest
    Build,
}

#[derive(Subcommand)]
enum TokensAction {
    /// Delete expired reset tokens
    Sweep,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Set an order's status
    Status {
        /// Order id
        id: i32,

        /// New status (`new`, `processing`, `shipped`, `delivered`, `cancelled`)
        status: OrderStatus,
    },
}

#[derive(Subcommand)]
enum MessagesAction {
    /// Show the newest messages
    List {
        /// How many messages to show
        #[arg(long, default_value_t = 20)]
        limit: i64,
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
        Commands::Assets {
            action: AssetsAction::Build,
        } => commands::build::assets()?,
        Commands::Prerender => commands::build::prerender()?,
        Commands::Tokens {
            action: TokensAction::Sweep,
        } => commands::maintenance::sweep_tokens().await?,
        Commands::Orders {
            action: OrdersAction::Status { id, status },
        } => commands::maintenance::set_order_status(id, status).await?,
        Commands::Messages {
            action: MessagesAction::List { limit },
        } => commands::maintenance::list_messages(limit).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_order_status() {
        let cli = Cli::try_parse_from(["ap-cli", "orders", "status", "42", "shipped"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Orders {
                action: OrdersAction::Status {
                    id: 42,
                    status: OrderStatus::Shipped
                }
            }
        ));
        assert!(Cli::try_parse_from(["ap-cli", "orders", "status", "42", "lost"]).is_err());
    }

    #[test]
    fn test_messages_limit_defaults() {
        let cli = Cli::try_parse_from(["ap-cli", "messages", "list"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Messages {
                action: MessagesAction::List { limit: 20 }
            }
        ));
    }
}
