//! In-memory key-value store: the trait contract without a database, used by
//! tests and the demo server when no PostgreSQL is configured.

use crate::store::{KeyPage, KvStore, StoreError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

const DEFAULT_PAGE_SIZE: usize = 1000;

pub struct MemoryKv {
    entries: RwLock<BTreeMap<String, String>>,
    page_size: usize,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Small page sizes let tests exercise the multi-page enumeration path.
    pub fn with_page_size(page_size: usize) -> Self {
        MemoryKv {
            entries: RwLock::new(BTreeMap::new()),
            page_size: page_size.max(1),
        }
    }
}

impl Default for MemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError> {
        let entries = self.entries.read().await;
        Ok(keys.iter().map(|k| entries.get(k).cloned()).collect())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn list(&self, cursor: Option<&str>) -> Result<KeyPage, StoreError> {
        let entries = self.entries.read().await;
        let keys: Vec<String> = match cursor {
            Some(c) => entries
                .range::<str, _>((std::ops::Bound::Excluded(c), std::ops::Bound::Unbounded))
                .take(self.page_size)
                .map(|(k, _)| k.clone())
                .collect(),
            None => entries.keys().take(self.page_size).cloned().collect(),
        };
        let list_complete = keys.len() < self.page_size;
        let cursor = if list_complete {
            None
        } else {
            keys.last().cloned()
        };
        Ok(KeyPage {
            keys,
            cursor,
            list_complete,
        })
    }
}
