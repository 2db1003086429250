//! Kiosk CLI - Database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (schema + session store)
//! kiosk-cli migrate
//!
//! # Create a category
//! kiosk-cli catalog add-category -n "Electronics" -d "Gadgets and devices"
//!
//! # Create a product
//! kiosk-cli catalog add-product -n "Desk Lamp" -p 24.99 -c 1 -s 100
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `catalog add-category` / `catalog add-product` - Catalog writes (the
//!   API itself never mutates the catalog)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "kiosk-cli")]
#[command(author, version, about = "Kiosk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Create a new category
    AddCategory {
        /// Category name (unique)
        #[arg(short, long)]
        name: String,

        /// Category description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Create a new product
    AddProduct {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Product description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Unit price, e.g. 24.99
        #[arg(short, long)]
        price: String,

        /// Category ID the product belongs to
        #[arg(short, long)]
        category: i32,

        /// Initial stock quantity
        #[arg(short, long, default_value_t = 0)]
        stock: i32,

        /// Optional image URL
        #[arg(short, long)]
        image_url: Option<String>,
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
        Commands::Catalog { action } => match action {
            CatalogAction::AddCategory { name, description } => {
                commands::catalog::add_category(&name, &description).await?;
            }
            CatalogAction::AddProduct {
                name,
                description,
                price,
                category,
                stock,
                image_url,
            } => {
                commands::catalog::add_product(
                    &name,
                    &description,
                    &price,
                    category,
                    stock,
                    image_url.as_deref(),
                )
                .await?;
            }
        },
    }
    Ok(())
}
