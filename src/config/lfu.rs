//! Configuration for the frequency cache.
//!
//! # Examples
//!
//! ```
//! use frequency_cache::config::FrequencyCacheConfig;
//! use frequency_cache::FrequencyCache;
//!
//! let config = FrequencyCacheConfig { capacity: 100 };
//! let cache: FrequencyCache<String, i32> = FrequencyCache::init(config, None);
//! assert_eq!(cache.cap(), 100);
//! ```

use core::fmt;

/// Configuration for a [`FrequencyCache`](crate::FrequencyCache).
///
/// # Fields
///
/// - `capacity`: Maximum number of entries the cache can hold. Zero is legal
///   and yields a cache that refuses every write.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FrequencyCacheConfig {
    /// Maximum number of key-value pairs the cache can hold
    pub capacity: usize,
}

impl fmt::Debug for FrequencyCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
