//! In-memory route store.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::store::{RouteStore, StoreError};

/// Route store held entirely in memory.
///
/// Built from the inline `[store.routes]` config table; also the
/// substrate for test doubles.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: HashMap<String, String>) -> Self {
        let store = Self::new();
        for (key, url) in table {
            store.entries.insert(key, url);
        }
        store
    }

    pub fn insert(&self, key: impl Into<String>, url: impl Into<String>) {
        self.entries.insert(key.into(), url.into());
    }

    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

#[async_trait]
impl RouteStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }
}
