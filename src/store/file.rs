//! JSON-file backed route store.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::store::{RouteStore, StoreError};

/// Route store backed by a JSON object file (`{"key": "https://origin"}`).
///
/// The file is re-read on every lookup so edits take effect without a
/// restart; the routing cache in front keeps lookups rare.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RouteStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let table: HashMap<String, String> = serde_json::from_str(&content)?;
        Ok(table.get(key).cloned())
    }
}
