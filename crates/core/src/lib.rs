//! Pantry Core - Shared types library.
//!
//! This crate provides the domain types used across all Pantry components:
//! - `storefront` - Client-side cart and wishlist store
//! - `cli` - Command-line driver over a file-backed store
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no notifications. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, cart lines, wishlist entries
//!   and the order-item projection handed to checkout

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
