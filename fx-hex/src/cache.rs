//! Rate table cache.
//!
//! Memoizes the full rate table under a single fixed key. There is only ever
//! one cached table; it is replaced wholesale, never patched.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use fx_types::{ConversionError, RateProvider, RateTable};
use tracing::debug;

/// Key of the one and only cache entry.
pub const RATES_CACHE_NAME: &str = "exchangeRates";

struct CachedTable {
    table: Arc<RateTable>,
    fetched_at: Instant,
}

/// Memoizing wrapper around a [`RateProvider`].
///
/// Concurrent misses may each hit the provider; the last writer wins. Readers
/// only ever see a complete `Arc<RateTable>`.
pub struct RateCache<P: RateProvider> {
    provider: P,
    entries: DashMap<&'static str, CachedTable>,
    ttl: Option<Duration>,
    fetches: AtomicU64,
}

impl<P: RateProvider> RateCache<P> {
    /// Creates a cache whose entry lives until [`invalidate`](Self::invalidate).
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            entries: DashMap::new(),
            ttl: None,
            fetches: AtomicU64::new(0),
        }
    }

    /// Creates a cache whose entry is also treated as absent once older than `ttl`.
    pub fn with_ttl(provider: P, ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::new(provider)
        }
    }

    /// Returns the cached table, fetching it on a miss.
    ///
    /// Failed fetches are not cached.
    pub async fn get_rates(&self) -> Result<Arc<RateTable>, ConversionError> {
        if let Some(table) = self.cached() {
            debug!(cache = RATES_CACHE_NAME, "Rate cache hit");
            return Ok(table);
        }

        debug!(cache = RATES_CACHE_NAME, "Rate cache miss");
        self.fetches.fetch_add(1, Ordering::Relaxed);
        let table = Arc::new(self.provider.fetch_rates().await?);

        self.entries.insert(
            RATES_CACHE_NAME,
            CachedTable {
                table: Arc::clone(&table),
                fetched_at: Instant::now(),
            },
        );
        Ok(table)
    }

    /// Drops the cached table. The next [`get_rates`](Self::get_rates) fetches.
    pub fn invalidate(&self) {
        if self.entries.remove(RATES_CACHE_NAME).is_some() {
            debug!(cache = RATES_CACHE_NAME, "Rate cache invalidated");
        }
    }

    /// Number of provider fetches attempted so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    pub fn is_cached(&self) -> bool {
        self.cached().is_some()
    }

    fn cached(&self) -> Option<Arc<RateTable>> {
        let entry = self.entries.get(RATES_CACHE_NAME)?;
        match self.ttl {
            Some(ttl) if entry.fetched_at.elapsed() >= ttl => None,
            _ => Some(Arc::clone(&entry.table)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_rates::StaticRateProvider;

    fn provider() -> StaticRateProvider {
        StaticRateProvider::from_pairs("EUR", &[("USD", 1.1), ("GBP", 0.85)]).unwrap()
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = RateCache::new(provider());
        assert!(!cache.is_cached());

        let first = cache.get_rates().await.unwrap();
        let second = cache.get_rates().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.fetch_count(), 1);
        assert!(cache.is_cached());
    }

    #[tokio::test]
    async fn test_invalidate_forces_fetch() {
        let cache = RateCache::new(provider());
        let first = cache.get_rates().await.unwrap();

        cache.invalidate();
        assert!(!cache.is_cached());

        let second = cache.get_rates().await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_on_empty_cache() {
        let cache = RateCache::new(provider());
        cache.invalidate();
        assert_eq!(cache.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = RateCache::with_ttl(provider(), Duration::ZERO);

        cache.get_rates().await.unwrap();
        cache.get_rates().await.unwrap();

        assert_eq!(cache.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_long_ttl_behaves_like_forever() {
        let cache = RateCache::with_ttl(provider(), Duration::from_secs(3600));

        cache.get_rates().await.unwrap();
        cache.get_rates().await.unwrap();

        assert_eq!(cache.fetch_count(), 1);
    }
}
