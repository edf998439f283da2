//! In-memory stores for tests and local development.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

use async_trait::async_trait;

use super::{CredentialStore, ItemStore, StoreError};
use crate::models::{Item, NewUser, User};

/// A row as `query_all` will report it.
#[derive(Debug, Clone)]
enum ItemRow {
    Item(Item),
    Undecodable(String),
}

/// Credential and item store held in process memory.
///
/// Items keep their insertion order. Point queries are counted so tests can
/// assert whether a read reached the store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, (User, String)>>,
    items: RwLock<Vec<ItemRow>>,
    next_user_id: AtomicI64,
    item_point_queries: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user with an existing password hash.
    pub fn with_user(self, user: User, password_hash: &str) -> Self {
        self.users
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(user.username.clone(), (user, password_hash.to_string()));
        self
    }

    /// Append an item to the catalog.
    pub fn with_item(self, item: Item) -> Self {
        self.push_item(item);
        self
    }

    /// Append a row that fails to decode when listed.
    pub fn with_undecodable_row(self, reason: &str) -> Self {
        self.items
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(ItemRow::Undecodable(reason.to_string()));
        self
    }

    /// Add an item after construction, e.g. one the cache has not seen.
    pub fn push_item(&self, item: Item) {
        self.items
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(ItemRow::Item(item));
    }

    /// Number of `query_by_id` calls served so far.
    pub fn item_point_queries(&self) -> u32 {
        self.item_point_queries.load(Ordering::SeqCst)
    }

    /// Stored password hash, for asserting what provisioning persisted.
    pub fn stored_hash(&self, username: &str) -> Option<String> {
        self.users
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(username)
            .map(|(_, hash)| hash.clone())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().unwrap_or_else(|e| e.into_inner());
        Ok(users.get(username).map(|(user, _)| user.clone()))
    }

    async fn find_password_hash(&self, username: &str) -> Result<Option<String>, StoreError> {
        Ok(self.stored_hash(username))
    }

    async fn insert_user(&self, user: NewUser, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().unwrap_or_else(|e| e.into_inner());
        if users.contains_key(&user.username) {
            return Err(StoreError::Duplicate(user.username));
        }
        let id = self.next_user_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = user.into_user(id);
        users.insert(user.username.clone(), (user.clone(), password_hash.to_string()));
        Ok(user)
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn query_all(&self) -> Result<Vec<Result<Item, StoreError>>, StoreError> {
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        Ok(items
            .iter()
            .map(|row| match row {
                ItemRow::Item(item) => Ok(item.clone()),
                ItemRow::Undecodable(reason) => Err(StoreError::Decode(reason.clone())),
            })
            .collect())
    }

    async fn query_by_id(&self, id: i64) -> Result<Option<Item>, StoreError> {
        self.item_point_queries.fetch_add(1, Ordering::SeqCst);
        let items = self.items.read().unwrap_or_else(|e| e.into_inner());
        Ok(items.iter().find_map(|row| match row {
            ItemRow::Item(item) if item.id == id => Some(item.clone()),
            _ => None,
        }))
    }
}
