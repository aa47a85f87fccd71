//! TTL-bounded routing table cache.
//!
//! # Responsibilities
//! - Cache store lookups for a fixed 4-hour window
//! - Resolve hostname-scoped default and forced-override keys
//! - Fold store misses into the default fallback chain
//!
//! # Design Decisions
//! - Process-wide DashMap, shared via Arc; entries replaced whole on
//!   refresh and never evicted (key cardinality is operator-bounded)
//! - Concurrent misses on one key each query the store; last write wins
//!   (all queries return the same backing value, so staleness only)
//! - Store read errors propagate; a missing key is a normal answer

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::observability::metrics;
use crate::store::{RouteStore, StoreError};

/// Validity window for a cached route.
pub const ROUTE_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// Prefix of the hostname-scoped default key family.
const DEFAULT_KEY_PREFIX: &str = "$default.";

/// Prefix of the hostname-scoped forced-override key family.
const FORCED_KEY_PREFIX: &str = "$forced.";

/// A resolved backend origin with its cache deadline.
#[derive(Debug, Clone)]
pub struct Route {
    /// Origin base URL as stored in the routing table.
    pub url: String,
    /// Entry is stale once this instant has passed.
    pub expires_at: Instant,
}

impl Route {
    fn fresh(url: String) -> Self {
        Self {
            url,
            expires_at: expiration_date(),
        }
    }

    /// A route is expired iff its deadline is in the past.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Instant::now()
    }
}

fn expiration_date() -> Instant {
    Instant::now() + ROUTE_TTL
}

/// In-process cache in front of the persistent route store.
pub struct RouteCache {
    store: Arc<dyn RouteStore>,
    entries: DashMap<String, Route>,
    default_key: String,
}

impl RouteCache {
    pub fn new(store: Arc<dyn RouteStore>, default_key: impl Into<String>) -> Self {
        Self {
            store,
            entries: DashMap::new(),
            default_key: default_key.into(),
        }
    }

    /// The configured global default-key sentinel.
    pub fn default_key(&self) -> &str {
        &self.default_key
    }

    /// Resolve a routing key to a route.
    ///
    /// Priority order, preserved exactly from the routing contract:
    /// 1. the default sentinel resolves the default chain;
    /// 2. a hostname-scoped forced override beats any explicit key,
    ///    even one with a valid store entry (operator escape hatch);
    /// 3. an empty key resolves the default chain;
    /// 4. direct lookup, falling back to the default chain on a miss.
    pub async fn get_route(
        &self,
        hostname: Option<&str>,
        key: &str,
    ) -> Result<Option<Route>, StoreError> {
        if key == self.default_key {
            return self.resolve_default(hostname).await;
        }

        if let Some(forced) = self.resolve_forced(hostname).await? {
            return Ok(Some(forced));
        }

        if key.is_empty() {
            return self.resolve_default(hostname).await;
        }

        if let Some(route) = self.lookup(key).await? {
            return Ok(Some(route));
        }

        self.resolve_default(hostname).await
    }

    /// Resolve the default route for a hostname.
    ///
    /// Tries the hostname-scoped default key first, then the global
    /// sentinel. Bounded iteration, not recursion.
    pub async fn resolve_default(
        &self,
        hostname: Option<&str>,
    ) -> Result<Option<Route>, StoreError> {
        let mut candidates = Vec::with_capacity(2);
        if let Some(host) = hostname {
            candidates.push(format!("{DEFAULT_KEY_PREFIX}{host}"));
        }
        candidates.push(self.default_key.clone());

        for cache_key in candidates {
            if let Some(route) = self.lookup(&cache_key).await? {
                return Ok(Some(route));
            }
        }
        Ok(None)
    }

    /// Resolve the forced override for a hostname.
    ///
    /// No global fallback: absence means "no override".
    pub async fn resolve_forced(
        &self,
        hostname: Option<&str>,
    ) -> Result<Option<Route>, StoreError> {
        let Some(host) = hostname else {
            return Ok(None);
        };
        self.lookup(&format!("{FORCED_KEY_PREFIX}{host}")).await
    }

    /// Cache-then-store lookup of a single cache key.
    async fn lookup(&self, cache_key: &str) -> Result<Option<Route>, StoreError> {
        if let Some(entry) = self.entries.get(cache_key) {
            if !entry.is_expired() {
                metrics::record_cache_lookup("hit");
                return Ok(Some(entry.value().clone()));
            }
        }

        match self.store.get(cache_key).await? {
            Some(url) => {
                metrics::record_cache_lookup("refresh");
                let route = Route::fresh(url);
                self.entries.insert(cache_key.to_string(), route.clone());
                Ok(Some(route))
            }
            None => {
                metrics::record_cache_lookup("miss");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store double that counts how often it is queried.
    struct CountingStore {
        inner: MemoryStore,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn new(entries: &[(&str, &str)]) -> Arc<Self> {
            let inner = MemoryStore::new();
            for (key, url) in entries {
                inner.insert(*key, *url);
            }
            Arc::new(Self {
                inner,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl RouteStore for CountingStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key).await
        }
    }

    fn cache_over(store: Arc<CountingStore>) -> RouteCache {
        RouteCache::new(store, "$default")
    }

    fn expire(cache: &RouteCache, key: &str) {
        let past = Instant::now() - Duration::from_millis(1);
        cache.entries.get_mut(key).unwrap().expires_at = past;
    }

    #[tokio::test]
    async fn sentinel_key_resolves_global_default() {
        let store = CountingStore::new(&[("$default", "https://fallback")]);
        let cache = cache_over(store);

        let route = cache.get_route(Some("h"), "$default").await.unwrap().unwrap();
        assert_eq!(route.url, "https://fallback");
    }

    #[tokio::test]
    async fn hostname_default_preferred_over_global() {
        let store = CountingStore::new(&[
            ("$default", "https://global"),
            ("$default.tenant.example", "https://scoped"),
        ]);
        let cache = cache_over(store);

        let scoped = cache
            .resolve_default(Some("tenant.example"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(scoped.url, "https://scoped");

        let global = cache.resolve_default(None).await.unwrap().unwrap();
        assert_eq!(global.url, "https://global");
    }

    #[tokio::test]
    async fn second_lookup_within_ttl_skips_store() {
        let store = CountingStore::new(&[("alice", "https://a")]);
        let cache = cache_over(store.clone());

        let first = cache.get_route(None, "alice").await.unwrap().unwrap();
        assert_eq!(first.url, "https://a");
        let calls_after_first = store.calls();

        let second = cache.get_route(None, "alice").await.unwrap().unwrap();
        assert_eq!(second.url, "https://a");
        assert_eq!(store.calls(), calls_after_first);
    }

    #[tokio::test]
    async fn expired_entry_requeries_and_extends_deadline() {
        let store = CountingStore::new(&[("alice", "https://a")]);
        let cache = cache_over(store.clone());

        cache.get_route(None, "alice").await.unwrap().unwrap();
        let calls_before = store.calls();
        expire(&cache, "alice");
        let stale_deadline = cache.entries.get("alice").unwrap().expires_at;

        let refreshed = cache.get_route(None, "alice").await.unwrap().unwrap();
        assert_eq!(refreshed.url, "https://a");
        assert!(store.calls() > calls_before);
        assert!(refreshed.expires_at > stale_deadline);
        assert!(refreshed.expires_at > Instant::now());
    }

    #[tokio::test]
    async fn forced_override_beats_explicit_key() {
        let store = CountingStore::new(&[
            ("alice", "https://a"),
            ("$forced.tenant.example", "https://maintenance"),
        ]);
        let cache = cache_over(store);

        // Override wins even though "alice" resolves on its own.
        let forced = cache
            .get_route(Some("tenant.example"), "alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(forced.url, "https://maintenance");

        // No hostname, no override.
        let direct = cache.get_route(None, "alice").await.unwrap().unwrap();
        assert_eq!(direct.url, "https://a");
    }

    #[tokio::test]
    async fn forced_key_has_no_global_fallback() {
        let store = CountingStore::new(&[("$forced.other.example", "https://elsewhere")]);
        let cache = cache_over(store);

        assert!(cache
            .resolve_forced(Some("tenant.example"))
            .await
            .unwrap()
            .is_none());
        assert!(cache.resolve_forced(None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_key_falls_back_to_default() {
        let store = CountingStore::new(&[("$default", "https://fallback")]);
        let cache = cache_over(store);

        let route = cache.get_route(Some("h"), "ghost").await.unwrap().unwrap();
        assert_eq!(route.url, "https://fallback");
    }

    #[tokio::test]
    async fn empty_key_resolves_default() {
        let store = CountingStore::new(&[("$default", "https://fallback")]);
        let cache = cache_over(store);

        let route = cache.get_route(None, "").await.unwrap().unwrap();
        assert_eq!(route.url, "https://fallback");
    }

    #[tokio::test]
    async fn nothing_resolves_when_store_is_empty() {
        let store = CountingStore::new(&[]);
        let cache = cache_over(store);

        assert!(cache.get_route(Some("h"), "ghost").await.unwrap().is_none());
        assert!(cache.resolve_default(Some("h")).await.unwrap().is_none());
    }
}
