use async_trait::async_trait;
use gn_core::{NewsPage, NewsProvider, NewsQuery, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// How long a fetched page is served from memory.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Upper bound on cached pages; the oldest entry is evicted first.
pub const DEFAULT_MAX_ENTRIES: usize = 512;

struct CacheEntry {
    stored_at: Instant,
    page: NewsPage,
}

/// Wraps a provider and reuses successful pages for `ttl`, holding at most
/// `max_entries` pages.
///
/// Freshness is advisory: a stale entry is simply refetched, and failures
/// are never stored.
pub struct CachedProvider<P> {
    inner: P,
    ttl: Duration,
    max_entries: usize,
    entries: RwLock<HashMap<NewsQuery, CacheEntry>>,
}

impl<P: NewsProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            max_entries: DEFAULT_MAX_ENTRIES,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl<P: NewsProvider> NewsProvider for CachedProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch_news(&self, query: &NewsQuery) -> Result<NewsPage> {
        if self.ttl.is_zero() || self.max_entries == 0 {
            return self.inner.fetch_news(query).await;
        }

        if let Some(entry) = self.entries.read().await.get(query) {
            if entry.stored_at.elapsed() < self.ttl {
                debug!(?query, "serving cached page");
                return Ok(entry.page.clone());
            }
        }

        let page = self.inner.fetch_news(query).await?;

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        while entries.len() >= self.max_entries && !entries.contains_key(query) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone());
            let Some(key) = oldest else { break };
            entries.remove(&key);
        }
        entries.insert(
            query.clone(),
            CacheEntry {
                stored_at: Instant::now(),
                page: page.clone(),
            },
        );

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gn_core::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingProvider {
        fn new(fail: bool) -> Self {
            Self { calls: AtomicUsize::new(0), fail }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NewsProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn fetch_news(&self, query: &NewsQuery) -> Result<NewsPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Upstream { status: 503 });
            }
            Ok(NewsPage {
                articles: vec![],
                total_results: query.page as u64,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_query_is_served_from_memory() {
        let cache = CachedProvider::new(CountingProvider::new(false), DEFAULT_TTL);
        let query = NewsQuery::default();

        cache.fetch_news(&query).await.unwrap();
        cache.fetch_news(&query).await.unwrap();

        assert_eq!(cache.inner().calls(), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_pages_are_cached_separately() {
        let cache = CachedProvider::new(CountingProvider::new(false), DEFAULT_TTL);

        let first = cache.fetch_news(&NewsQuery::headlines(None, 1)).await.unwrap();
        let second = cache.fetch_news(&NewsQuery::headlines(None, 2)).await.unwrap();

        assert_eq!(first.total_results, 1);
        assert_eq!(second.total_results, 2);
        assert_eq!(cache.inner().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_expire_after_ttl() {
        let cache = CachedProvider::new(CountingProvider::new(false), DEFAULT_TTL);
        let query = NewsQuery::default();

        cache.fetch_news(&query).await.unwrap();
        tokio::time::advance(DEFAULT_TTL + Duration::from_secs(1)).await;
        cache.fetch_news(&query).await.unwrap();

        assert_eq!(cache.inner().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_are_not_cached() {
        let cache = CachedProvider::new(CountingProvider::new(true), DEFAULT_TTL);
        let query = NewsQuery::default();

        assert!(cache.fetch_news(&query).await.is_err());
        assert!(cache.fetch_news(&query).await.is_err());

        assert_eq!(cache.inner().calls(), 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oldest_entry_is_evicted_at_capacity() {
        let cache = CachedProvider::new(CountingProvider::new(false), DEFAULT_TTL).with_max_entries(2);

        for page in 1..=3 {
            cache.fetch_news(&NewsQuery::headlines(None, page)).await.unwrap();
            tokio::time::advance(Duration::from_secs(1)).await;
        }
        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.inner().calls(), 3);

        cache.fetch_news(&NewsQuery::headlines(None, 3)).await.unwrap();
        assert_eq!(cache.inner().calls(), 3);

        cache.fetch_news(&NewsQuery::headlines(None, 1)).await.unwrap();
        assert_eq!(cache.inner().calls(), 4);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_caching() {
        let cache = CachedProvider::new(CountingProvider::new(false), Duration::ZERO);
        let query = NewsQuery::default();

        cache.fetch_news(&query).await.unwrap();
        cache.fetch_news(&query).await.unwrap();

        assert_eq!(cache.inner().calls(), 2);
    }
}
