//! Pantry CLI - inspect and edit a file-backed cart and wishlist.
//!
//! # Usage
//!
//! ```bash
//! # Add two apples (stock snapshot 5)
//! pantry cart add --id p1 --name Apple --price 180 --stock 5 --qty 2
//!
//! # Bump, show, and print the order payload
//! pantry cart inc p1
//! pantry cart show
//! pantry cart order
//!
//! # Toggle a wishlist entry
//! pantry wishlist toggle --id p2 --name Banana --price 90
//! ```
//!
//! # Commands
//!
//! - `cart` - `show`, `add`, `remove`, `set`, `inc`, `dec`, `clear`, `order`
//! - `wishlist` - `show`, `add`, `remove`, `toggle`, `clear`
//!
//! State lives under `PANTRY_STORAGE_DIR` (default `.pantry`) unless `--dir`
//! is given. `cart order` writes its JSON payload to stdout; everything else
//! is reported through the log at `info` level, so `RUST_LOG=warn` silences
//! listings and status lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{CommandError, ProductArgs};

#[derive(Parser)]
#[command(name = "pantry")]
#[command(author, version, about = "Pantry cart and wishlist tools")]
struct Cli {
    /// Storage directory (overrides `PANTRY_STORAGE_DIR`)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// List lines and totals
    Show,
    /// Add a product
    Add {
        #[command(flatten)]
        product: ProductArgs,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
    /// Remove a line
    Remove {
        /// Product id
        id: String,
    },
    /// Set a line's quantity
    Set {
        /// Product id
        id: String,
        /// New quantity
        qty: u32,
    },
    /// Add one unit
    Inc {
        /// Product id
        id: String,
    },
    /// Remove one unit (never below one)
    Dec {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Print the order-submission payload
    Order,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// List saved products
    Show,
    /// Save a product
    Add {
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Drop a saved product
    Remove {
        /// Product id
        id: String,
    },
    /// Save if absent, drop if present
    Toggle {
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Empty the wishlist
    Clear,
}

fn init_tracing(json: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pantry=info,pantry_storefront=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).without_time())
            .init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CommandError> {
    let context = commands::open_context(cli.dir)?;

    match cli.command {
        Commands::Cart { action } => {
            let cart = context.cart();
            match action {
                CartAction::Show => commands::cart::show(&cart),
                CartAction::Add { product, qty } => commands::cart::add(&cart, product, qty)?,
                CartAction::Remove { id } => commands::cart::remove(&cart, &id)?,
                CartAction::Set { id, qty } => commands::cart::set(&cart, &id, qty)?,
                CartAction::Inc { id } => commands::cart::increment(&cart, &id)?,
                CartAction::Dec { id } => commands::cart::decrement(&cart, &id)?,
                CartAction::Clear => commands::cart::clear(&cart),
                CartAction::Order => commands::cart::order(&cart)?,
            }
        }
        Commands::Wishlist { action } => {
            let wishlist = context.wishlist();
            match action {
                WishlistAction::Show => commands::wishlist::show(&wishlist),
                WishlistAction::Add { product } => commands::wishlist::add(&wishlist, product)?,
                WishlistAction::Remove { id } => commands::wishlist::remove(&wishlist, &id)?,
                WishlistAction::Toggle { product } => {
                    commands::wishlist::toggle(&wishlist, product)?;
                }
                WishlistAction::Clear => commands::wishlist::clear(&wishlist),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from([
            "pantry", "--dir", "/tmp/p", "cart", "add", "--id", "p1", "--name", "Apple",
            "--price", "180", "--stock", "5", "--qty", "2",
        ])
        .unwrap();

        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/p")));
        match cli.command {
            Commands::Cart {
                action: CartAction::Add { product, qty },
            } => {
                assert_eq!(product.id, "p1");
                assert_eq!(product.stock, 5);
                assert_eq!(qty, 2);
            }
            _ => panic!("expected cart add"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_price() {
        let result = Cli::try_parse_from([
            "pantry", "wishlist", "add", "--id", "p2", "--name", "Banana", "--price", "cheap",
        ]);
        assert!(result.is_err());
    }
}
