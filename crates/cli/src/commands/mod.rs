//! CLI command implementations.

pub mod cart;
pub mod wishlist;

use std::path::PathBuf;
use std::sync::Arc;

use pantry_core::{Price, ProductId, ProductIdError, ProductSnapshot};
use pantry_storefront::{ConfigError, FileStorage, StoreConfig, StoreContext};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A product id argument was blank.
    #[error("Invalid product id: {0}")]
    ProductId(#[from] ProductIdError),

    /// Output could not be rendered.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Catalog fields for a product given on the command line.
#[derive(Debug, Clone, clap::Args)]
pub struct ProductArgs {
    /// Catalog product id
    #[arg(long)]
    pub id: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Unit price
    #[arg(long)]
    pub price: Decimal,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    pub stock: u32,

    /// URL slug
    #[arg(long, default_value = "")]
    pub slug: String,

    /// Image URL
    #[arg(long)]
    pub image: Option<String>,
}

impl ProductArgs {
    /// Convert into a catalog snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is blank.
    pub fn into_snapshot(self) -> Result<ProductSnapshot, CommandError> {
        let mut product = ProductSnapshot::new(
            ProductId::parse(&self.id)?,
            self.name,
            Price::new(self.price),
            self.stock,
        )
        .with_slug(self.slug);
        product.image = self.image;
        Ok(product)
    }
}

/// Open a store context over file storage.
///
/// Loads `.env`, reads `PANTRY_*` configuration, and lets `dir` override the
/// storage directory.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn open_context(dir: Option<PathBuf>) -> Result<StoreContext, CommandError> {
    dotenvy::dotenv().ok();

    let mut config = StoreConfig::from_env()?;
    if let Some(dir) = dir {
        config = config.with_storage_dir(dir);
    }

    tracing::debug!(dir = %config.storage_dir.display(), "opening file storage");
    let storage = Arc::new(FileStorage::new(config.storage_dir.clone()));
    Ok(StoreContext::new(config, storage))
}

/// Parse a product id argument.
///
/// # Errors
///
/// Returns an error if the id is blank.
pub fn product_id(raw: &str) -> Result<ProductId, CommandError> {
    Ok(ProductId::parse(raw)?)
}
