//! # pos_core
//!
//! Core domain logic for the POS backend: authentication, the item cache,
//! user provisioning and the stores behind them.

pub mod auth;
pub mod items;
pub mod migrate;
pub mod models;
pub mod store;
pub mod users;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
