//! Tangerine CLI - Cart inspection and checkout tools.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! tg-cli cart show
//!
//! # Add a product to the cart
//! tg-cli cart add --id 1 --title "Blue Widget" --price "\$10.00" --stock 3
//!
//! # Change a quantity (capped at --max when given)
//! tg-cli cart set 1 2 --max 3
//!
//! # Remove a line / empty the cart
//! tg-cli cart remove 1
//! tg-cli cart clear
//!
//! # Print the order payload that checkout would submit
//! tg-cli checkout --dry-run
//! ```
//!
//! # Commands
//!
//! - `cart` - Inspect and mutate the persisted cart
//! - `checkout` - Build (and optionally submit) the order payload

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tg-cli")]
#[command(author, version, about = "Tangerine CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and mutate the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Build the order payload from the current cart
    Checkout {
        /// Print the payload instead of submitting it
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart's line items and totals
    Show,
    /// Add one unit of a product
    Add {
        /// Product id from the catalog
        #[arg(long)]
        id: i64,

        /// Product title
        #[arg(long)]
        title: String,

        /// Price label as displayed (e.g. "$10.00")
        #[arg(long)]
        price: String,

        /// Currently available stock
        #[arg(long)]
        stock: i64,

        /// Image URL
        #[arg(long)]
        image: Option<String>,

        /// Category name
        #[arg(long)]
        category: Option<String>,

        /// Product description
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a line item
    Remove {
        /// Product id to remove
        id: i64,
    },
    /// Set the quantity of a line item (zero removes it)
    Set {
        /// Product id to update
        id: i64,

        /// New quantity
        quantity: i64,

        /// Cap the quantity at this maximum
        #[arg(long)]
        max: Option<u32>,
    },
    /// Empty the cart
    Clear,
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
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show()?,
            CartAction::Add {
                id,
                title,
                price,
                stock,
                image,
                category,
                description,
            } => commands::cart::add(id, title, price, stock, image, category, description)?,
            CartAction::Remove { id } => commands::cart::remove(id)?,
            CartAction::Set { id, quantity, max } => commands::cart::set(id, quantity, max)?,
            CartAction::Clear => commands::cart::clear()?,
        },
        Commands::Checkout { dry_run } => commands::checkout::run(dry_run).await?,
    }
    Ok(())
}
