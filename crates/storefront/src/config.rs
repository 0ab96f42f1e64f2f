//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PANTRY_CART_KEY` - Storage key of the cart (default: `cart`)
//! - `PANTRY_WISHLIST_KEY` - Storage key of the wishlist (default: `wishlist`)
//! - `PANTRY_STORAGE_DIR` - Directory used by file-backed storage (default: `.pantry`)

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::validate_key;

pub const DEFAULT_CART_KEY: &str = "cart";
pub const DEFAULT_WISHLIST_KEY: &str = "wishlist";
pub const DEFAULT_STORAGE_DIR: &str = ".pantry";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart and wishlist store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Fixed storage key of the cart collection
    pub cart_key: String,
    /// Fixed storage key of the wishlist collection
    pub wishlist_key: String,
    /// Root directory for file-backed storage
    pub storage_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cart_key: DEFAULT_CART_KEY.to_string(),
            wishlist_key: DEFAULT_WISHLIST_KEY.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
        }
    }
}

impl StoreConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is malformed or both collections share a key.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StoreConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            cart_key: get("PANTRY_CART_KEY", DEFAULT_CART_KEY),
            wishlist_key: get("PANTRY_WISHLIST_KEY", DEFAULT_WISHLIST_KEY),
            storage_dir: PathBuf::from(get("PANTRY_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check key syntax and that cart and wishlist do not collide.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] naming the offending variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_key(&self.cart_key)
            .map_err(|e| ConfigError::InvalidEnvVar("PANTRY_CART_KEY".to_string(), e.to_string()))?;
        validate_key(&self.wishlist_key).map_err(|e| {
            ConfigError::InvalidEnvVar("PANTRY_WISHLIST_KEY".to_string(), e.to_string())
        })?;

        if self.cart_key == self.wishlist_key {
            return Err(ConfigError::InvalidEnvVar(
                "PANTRY_WISHLIST_KEY".to_string(),
                format!("must differ from PANTRY_CART_KEY ({})", self.cart_key),
            ));
        }

        Ok(())
    }

    /// Override the storage directory.
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }
}
