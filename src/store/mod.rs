//! Route store subsystem.
//!
//! # Data Flow
//! ```text
//! RouteCache miss
//!     → store.get(key)
//!     → file.rs (re-read JSON table from disk)
//!       or memory.rs (inline table)
//!     → Some(origin URL) | None
//! ```
//!
//! # Design Decisions
//! - The store is read-only from the proxy's perspective
//! - Absence of a key is a normal answer, never an error
//! - I/O and parse failures propagate; the request handler turns them
//!   into a 500 response

pub mod file;
pub mod memory;

use async_trait::async_trait;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Error raised while reading the route store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("route store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("route store parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persistent mapping from routing key to origin URL.
///
/// `get` may suspend on I/O. A missing key is `Ok(None)`.
#[async_trait]
pub trait RouteStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}
