//! GoMarketplace CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cart list
//!
//! # Add a product (a new line always starts at quantity 1)
//! gm-cart add --id 1 --title "Shirt" --image-url https://img.example/1.png --price 19.90
//!
//! # Change quantities
//! gm-cart increment 1
//! gm-cart decrement 1
//!
//! # Total units in the cart
//! gm-cart count
//! ```
//!
//! # Commands
//!
//! - `list` - Print the cart lines
//! - `count` - Print the total number of units
//! - `add` - Add one unit of a product
//! - `increment` / `decrement` - Change the quantity of a line
//!
//! Storage location comes from `CART_STORAGE_DIR` / `CART_STORAGE_KEY`
//! (see `gomarketplace_cart::config`) unless overridden with `--dir` / `--key`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gomarketplace_cart::{CartConfig, CartStore};
use gomarketplace_core::{NewCartItem, ProductId};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "gm-cart")]
#[command(author, version, about = "GoMarketplace cart tools")]
struct Cli {
    /// Directory holding the persisted cart
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Storage key of the cart snapshot
    #[arg(long, global = true)]
    key: Option<String>,

    /// Print the cart as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart lines
    List,
    /// Print the total number of units in the cart
    Count,
    /// Add one unit of a product
    Add {
        /// Product id
        #[arg(long)]
        id: ProductId,

        /// Product title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long)]
        image_url: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,
    },
    /// Add one unit to an existing line
    Increment {
        /// Product id
        id: String,
    },
    /// Remove one unit from a line, dropping it at zero
    Decrement {
        /// Product id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout carries only cart output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gomarketplace_cart=info,gomarketplace_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let mut config = CartConfig::from_env()?;
    if let Some(dir) = cli.dir {
        config.storage_dir = dir;
    }
    if let Some(key) = cli.key {
        config.storage_key = key;
    }

    tracing::debug!(
        dir = %config.storage_dir.display(),
        key = %config.storage_key,
        "Opening cart"
    );

    let store = CartStore::from_config(&config);
    store.initialize().await;

    let output = if cli.json {
        commands::Output::Json
    } else {
        commands::Output::Table
    };

    match cli.command {
        Commands::List => commands::list(&store, output).await?,
        Commands::Count => commands::count(&store).await,
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => {
            let product = NewCartItem::new(id, title, image_url, price);
            commands::add(&store, product, output).await?;
        }
        Commands::Increment { id } => commands::increment(&store, &id, output).await?,
        Commands::Decrement { id } => commands::decrement(&store, &id, output).await?,
    }
    Ok(())
}
