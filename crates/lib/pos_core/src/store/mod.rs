//! Persistence seams: the credential store and the item store.
//!
//! Services depend on these traits only; `MySqlStore` backs them in
//! production and `MemoryStore` in tests and local development.

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Item, NewUser, User};

/// Store errors. "Not found" is not an error; lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// User records and password hashes, keyed by username.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn find_password_hash(&self, username: &str) -> Result<Option<String>, StoreError>;

    /// Insert a user with an already-hashed password.
    ///
    /// Fails with `StoreError::Duplicate` when the username is taken.
    async fn insert_user(&self, user: NewUser, password_hash: &str) -> Result<User, StoreError>;
}

/// Read access to the item catalog.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Every item, one decode result per row so callers can skip bad rows.
    async fn query_all(&self) -> Result<Vec<Result<Item, StoreError>>, StoreError>;

    async fn query_by_id(&self, id: i64) -> Result<Option<Item>, StoreError>;
}
