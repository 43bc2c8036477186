//! Memoization of usage summaries keyed by the resolved date range

use crate::aggregator::{AggregationManager, UsageSummary};
use bikeshare_common::{DailyRecord, DateRange};
use bikeshare_config::CacheConfig;
use moka::sync::Cache;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Hit and miss counters of the summary cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Summaries served from the cache
    pub hits: u64,
    /// Summaries computed
    pub misses: u64,
    /// Entries currently held
    pub entries: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Aggregation manager that memoizes summaries per [`DateRange`].
///
/// The dataset never changes after loading, so a range fully determines its
/// summary and entries never need to expire.
pub struct CachedAggregationManager {
    aggregator: AggregationManager,
    cache: Option<Cache<DateRange, Arc<UsageSummary>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for CachedAggregationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedAggregationManager")
            .field("enabled", &self.is_enabled())
            .field("stats", &self.stats())
            .finish()
    }
}

impl CachedAggregationManager {
    /// Create a manager from the cache section of the configuration
    pub fn new(config: &CacheConfig) -> Self {
        let cache = config.enabled.then(|| {
            info!(max_capacity = config.max_capacity, "Summary cache enabled");
            Cache::builder().max_capacity(config.max_capacity).build()
        });
        Self {
            aggregator: AggregationManager::new(),
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Create without caching (pass-through mode)
    pub fn without_cache() -> Self {
        Self::new(&CacheConfig {
            enabled: false,
            max_capacity: 0,
        })
    }

    /// Whether summaries are memoized
    pub const fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Summary for `range`, computing it from `select()` on a miss.
    ///
    /// `select` is only called when the summary is not cached.
    #[instrument(skip(self, select), fields(%range))]
    pub fn summarize<F>(&self, range: DateRange, select: F) -> Arc<UsageSummary>
    where
        F: FnOnce() -> Vec<DailyRecord>,
    {
        if let Some(cached) = self.cache.as_ref().and_then(|cache| cache.get(&range)) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Cache hit for usage summary");
            return cached;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Cache miss for usage summary - computing data");
        let records = select();
        let summary = Arc::new(self.aggregator.summarize(&records, range));

        if let Some(cache) = &self.cache {
            cache.insert(range, Arc::clone(&summary));
        }
        summary
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.as_ref().map_or(0, Cache::entry_count),
        }
    }

    /// Drop every memoized summary
    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
            info!("Invalidated all cached summaries");
        }
    }
}
