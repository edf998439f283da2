//! Read-through item cache.
//!
//! Warmed from the store at construction. Point misses query the store and,
//! when the item exists, write it back so the next read is served from
//! memory. Misses and store failures yield `Item::default()` and are not
//! cached.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::{debug, error, info, warn};

use crate::models::Item;
use crate::store::ItemStore;

/// A cached item and the order it entered the cache.
#[derive(Debug, Clone)]
struct CachedItem {
    seq: u64,
    item: Item,
}

/// In-memory item index keyed by item id, safe for concurrent readers.
pub struct ItemCache {
    store: Arc<dyn ItemStore>,
    entries: DashMap<i64, CachedItem>,
    next_seq: AtomicU64,
}

impl ItemCache {
    /// Build the cache and bulk-load every item from `store`.
    ///
    /// Rows that fail to decode are skipped; if the listing itself fails the
    /// cache starts empty and fills through point lookups.
    pub async fn warm(store: Arc<dyn ItemStore>) -> Self {
        let cache = Self {
            store,
            entries: DashMap::new(),
            next_seq: AtomicU64::new(0),
        };

        let rows = match cache.store.query_all().await {
            Ok(rows) => rows,
            Err(e) => {
                error!(error = %e, "item cache: failed to list items, starting empty");
                return cache;
            }
        };

        let mut skipped = 0usize;
        for row in rows {
            match row {
                Ok(item) => cache.insert(item),
                Err(e) => {
                    skipped += 1;
                    warn!(error = %e, "item cache: skipping undecodable row");
                }
            }
        }

        info!(items = cache.len(), skipped, "item cache warmed");
        cache
    }

    /// Number of cached items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every cached item, sorted by name; equal names keep insertion order.
    /// Never queries the store.
    pub fn get_all(&self) -> Vec<Item> {
        let mut cached: Vec<CachedItem> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        cached.sort_by(|a, b| a.item.name.cmp(&b.item.name).then(a.seq.cmp(&b.seq)));
        cached.into_iter().map(|c| c.item).collect()
    }

    /// The item with `id`, or `Item::default()` if it cannot be found.
    pub async fn get_by_id(&self, id: i64) -> Item {
        // Clone out so no map guard is held across the store query.
        let hit = self.entries.get(&id).map(|entry| entry.item.clone());
        if let Some(item) = hit {
            return item;
        }

        match self.store.query_by_id(id).await {
            Ok(Some(item)) => {
                debug!(item_id = id, "item cache: filled from store");
                self.entries
                    .entry(id)
                    .or_insert_with(|| CachedItem {
                        seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
                        item,
                    })
                    .item
                    .clone()
            }
            Ok(None) => {
                debug!(item_id = id, "item cache: item not found");
                Item::default()
            }
            Err(e) => {
                error!(item_id = id, error = %e, "item cache: point query failed");
                Item::default()
            }
        }
    }

    fn insert(&self, item: Item) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        self.entries.insert(item.id, CachedItem { seq, item });
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::store::{MemoryStore, StoreError};

    fn item(id: i64, name: &str) -> Item {
        Item {
            id,
            name: name.into(),
            code: format!("C{id}"),
            ..Default::default()
        }
    }

    fn names(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    /// Item store whose every query fails.
    struct DownStore;

    #[async_trait]
    impl ItemStore for DownStore {
        async fn query_all(&self) -> Result<Vec<Result<Item, StoreError>>, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }

        async fn query_by_id(&self, _id: i64) -> Result<Option<Item>, StoreError> {
            Err(StoreError::Unavailable("down".into()))
        }
    }

    #[tokio::test]
    async fn get_all_sorts_by_name() {
        let store = Arc::new(
            MemoryStore::new()
                .with_item(item(1, "Banana"))
                .with_item(item(2, "Apple")),
        );
        let cache = ItemCache::warm(store).await;
        assert_eq!(names(&cache.get_all()), ["Apple", "Banana"]);
    }

    #[tokio::test]
    async fn equal_names_keep_insertion_order() {
        let store = Arc::new(
            MemoryStore::new()
                .with_item(item(30, "Tile"))
                .with_item(item(10, "Marble"))
                .with_item(item(20, "Tile")),
        );
        let cache = ItemCache::warm(store).await;
        let ids: Vec<i64> = cache.get_all().iter().map(|i| i.id).collect();
        assert_eq!(ids, [10, 30, 20]);
    }

    #[tokio::test]
    async fn undecodable_rows_are_skipped() {
        let store = Arc::new(
            MemoryStore::new()
                .with_item(item(1, "Granite"))
                .with_undecodable_row("bad length")
                .with_item(item(2, "Onyx")),
        );
        let cache = ItemCache::warm(store).await;
        assert_eq!(cache.len(), 2);
        assert_eq!(names(&cache.get_all()), ["Granite", "Onyx"]);
    }

    #[tokio::test]
    async fn failed_listing_starts_empty() {
        let cache = ItemCache::warm(Arc::new(DownStore)).await;
        assert!(cache.is_empty());
        assert!(cache.get_all().is_empty());
    }

    #[tokio::test]
    async fn warmed_id_is_served_without_querying_the_store() {
        let store = Arc::new(MemoryStore::new().with_item(item(7, "Slate")));
        let cache = ItemCache::warm(store.clone()).await;

        assert_eq!(cache.get_by_id(7).await, item(7, "Slate"));
        assert_eq!(store.item_point_queries(), 0);
    }

    #[tokio::test]
    async fn point_miss_is_filled_and_then_cached() {
        let store = Arc::new(MemoryStore::new().with_item(item(1, "Slate")));
        let cache = ItemCache::warm(store.clone()).await;
        store.push_item(item(2, "Quartz"));

        assert_eq!(cache.get_by_id(2).await, item(2, "Quartz"));
        assert_eq!(store.item_point_queries(), 1);

        assert_eq!(cache.get_by_id(2).await, item(2, "Quartz"));
        assert_eq!(store.item_point_queries(), 1);
        assert_eq!(names(&cache.get_all()), ["Quartz", "Slate"]);
    }

    #[tokio::test]
    async fn not_found_returns_zero_item_and_is_not_cached() {
        let store = Arc::new(MemoryStore::new());
        let cache = ItemCache::warm(store.clone()).await;

        assert_eq!(cache.get_by_id(404).await, Item::default());
        assert_eq!(cache.get_by_id(404).await, Item::default());
        assert_eq!(store.item_point_queries(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn store_failure_returns_zero_item() {
        let cache = ItemCache::warm(Arc::new(DownStore)).await;
        assert_eq!(cache.get_by_id(1).await, Item::default());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_readers_see_consistent_items() {
        let mut store = MemoryStore::new();
        for id in 0..50 {
            store = store.with_item(item(id, &format!("Item {id:02}")));
        }
        let cache = Arc::new(ItemCache::warm(Arc::new(store)).await);

        let mut handles = Vec::new();
        for worker in 0..8i64 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for id in 0..50 {
                    let got = cache.get_by_id((id + worker) % 50).await;
                    assert_eq!(got.id, (id + worker) % 50);
                    assert_eq!(cache.get_all().len(), 50);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    }
}
