//! Seagrape CLI - inspect and drive a disk-backed cart and wishlist.
//!
//! # Usage
//!
//! ```bash
//! # Add one unit of a product variant to the cart
//! sg-cli cart add -p 7 -t "Box Logo Tee" --price 100.00 -s M -c red
//!
//! # List cart lines with the derived count and total
//! sg-cli cart list
//!
//! # Set a line's quantity (0 removes the line)
//! sg-cli cart set-qty 7-M-red 5
//!
//! # Save a product to the wishlist
//! sg-cli wishlist add -p 12 -t "Wool Socks" --price 12.00
//! ```
//!
//! # Commands
//!
//! - `cart` - list/add/remove/set-qty/clear/total
//! - `wishlist` - list/add/remove
//!
//! Storage lives under `SEAGRAPE_DATA_DIR` (default `.seagrape`), one JSON
//! file per storage key, shared with any other process pointed at the same
//! directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "sg-cli")]
#[command(author, version, about = "Seagrape CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Operate the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Operate the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart lines with the derived count and total
    List,
    /// Add one unit of a product variant
    Add {
        /// Catalog product id
        #[arg(short, long)]
        product_id: i32,

        /// Product title
        #[arg(short, long)]
        title: String,

        /// Unit price (e.g., 19.99)
        #[arg(long)]
        price: Decimal,

        /// Product image reference
        #[arg(long)]
        image: Option<String>,

        /// Selected size
        #[arg(short, long)]
        size: Option<String>,

        /// Selected color
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Remove a line by its id (e.g., 7-M-red)
    Remove {
        /// Line id
        id: String,
    },
    /// Set a line's quantity (0 removes the line)
    SetQty {
        /// Line id
        id: String,

        /// New quantity
        quantity: u32,
    },
    /// Empty the cart
    Clear,
    /// Print the cart total
    Total,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// List saved products
    List,
    /// Save a product
    Add {
        /// Catalog product id
        #[arg(short, long)]
        product_id: i32,

        /// Product title
        #[arg(short, long)]
        title: String,

        /// Unit price (e.g., 19.99)
        #[arg(long)]
        price: Decimal,

        /// Product image reference
        #[arg(long)]
        image: Option<String>,
    },
    /// Remove a saved product
    Remove {
        /// Catalog product id
        product_id: i32,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before reading configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), commands::CliError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list().await?,
            CartAction::Add {
                product_id,
                title,
                price,
                image,
                size,
                color,
            } => commands::cart::add(product_id, title, price, image, size, color).await?,
            CartAction::Remove { id } => commands::cart::remove(id).await?,
            CartAction::SetQty { id, quantity } => {
                commands::cart::set_quantity(id, quantity).await?;
            }
            CartAction::Clear => commands::cart::clear().await?,
            CartAction::Total => commands::cart::total().await?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::List => commands::wishlist::list().await?,
            WishlistAction::Add {
                product_id,
                title,
                price,
                image,
            } => commands::wishlist::add(product_id, title, price, image).await?,
            WishlistAction::Remove { product_id } => {
                commands::wishlist::remove(product_id).await?;
            }
        },
    }
    Ok(())
}
