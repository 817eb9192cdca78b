//! Cache Configuration Module
//!
//! Configuration structs have public fields and no builders: create the struct
//! with every field set and hand it to the cache's `init` constructor.
//!
//! | Config | Cache |
//! |--------|-------|
//! | [`FrequencyCacheConfig`] | [`FrequencyCache`](crate::FrequencyCache) |
//! | `ConcurrentFrequencyCacheConfig` | `ConcurrentFrequencyCache` (feature `concurrent`) |
//!
//! # Examples
//!
//! ```
//! use frequency_cache::config::FrequencyCacheConfig;
//! use frequency_cache::FrequencyCache;
//!
//! let config = FrequencyCacheConfig { capacity: 1000 };
//! let cache: FrequencyCache<String, i32> = FrequencyCache::init(config, None);
//! assert!(cache.is_empty());
//! ```

pub mod lfu;

pub use lfu::FrequencyCacheConfig;

/// Generic configuration wrapper for concurrent caches.
///
/// Wraps a base cache configuration and adds the number of independent
/// segments used for sharding. The base capacity is the total across all
/// segments.
///
/// # Example
///
/// ```
/// use frequency_cache::config::{
///     ConcurrentCacheConfig, ConcurrentFrequencyCacheConfig, FrequencyCacheConfig,
/// };
///
/// let config: ConcurrentFrequencyCacheConfig = ConcurrentCacheConfig {
///     base: FrequencyCacheConfig { capacity: 10_000 },
///     segments: 16,
/// };
/// assert_eq!(config.segments, 16);
/// ```
#[cfg(feature = "concurrent")]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ConcurrentCacheConfig<C> {
    /// Base configuration for the underlying cache
    pub base: C,
    /// Number of segments for sharding (more segments = less contention)
    pub segments: usize,
}

#[cfg(feature = "concurrent")]
impl<C: core::fmt::Debug> core::fmt::Debug for ConcurrentCacheConfig<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentCacheConfig")
            .field("base", &self.base)
            .field("segments", &self.segments)
            .finish()
    }
}

#[cfg(feature = "concurrent")]
/// Configuration for a concurrent frequency cache.
/// Type alias for `ConcurrentCacheConfig<FrequencyCacheConfig>`.
pub type ConcurrentFrequencyCacheConfig = ConcurrentCacheConfig<FrequencyCacheConfig>;
