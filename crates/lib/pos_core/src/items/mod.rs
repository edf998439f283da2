//! Item catalog access.

pub mod cache;

pub use cache::ItemCache;
