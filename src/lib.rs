#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Structure
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ FrequencyCache                                                   │
//! │                                                                  │
//! │   entry table                 frequency index (BTreeMap)         │
//! │   HashMap<K, SlotId>          0 ─► [oldest … newest]             │
//! │          │                    3 ─► [oldest … newest]             │
//! │          ▼                    7 ─► [oldest … newest]             │
//! │   slot arena: key, value, frequency, prev/next links             │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use frequency_cache::FrequencyCache;
//! use frequency_cache::config::FrequencyCacheConfig;
//!
//! let config = FrequencyCacheConfig { capacity: 2 };
//! let mut cache = FrequencyCache::init(config, None);
//! cache.put("rare", 1);
//! cache.put("popular", 2);
//!
//! for _ in 0..10 { cache.get(&"popular"); }
//!
//! cache.put("new", 3);  // "rare" evicted (lowest frequency)
//! assert!(cache.get(&"popular").is_some());
//! assert!(cache.get(&"rare").is_none());
//! ```
//!
//! ## Concurrent Cache
//!
//! Enable the `concurrent` feature for a thread-safe version that shards keys
//! across independently locked segments:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │              ConcurrentFrequencyCache (16 segments)                │
//! │                                                                    │
//! │  ┌─────────┐ ┌─────────┐ ┌─────────┐     ┌─────────┐               │
//! │  │Segment 0│ │Segment 1│ │Segment 2│ ... │Segment15│               │
//! │  │ [Mutex] │ │ [Mutex] │ │ [Mutex] │     │ [Mutex] │               │
//! │  └─────────┘ └─────────┘ └─────────┘     └─────────┘               │
//! │       ▲           ▲           ▲               ▲                    │
//! │  hash(k1)%16  hash(k2)%16  hash(k3)%16   hash(kN)%16               │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`lfu`]: the frequency cache and its write outcomes
//! - [`config`]: configuration structures
//! - [`metrics`]: counters and the [`CacheMetrics`](metrics::CacheMetrics) trait
//! - [`error`]: the invariant check error
//! - `concurrent`: thread-safe segmented cache (requires `concurrent` feature)

#![no_std]

#[cfg(any(feature = "std", not(feature = "hashbrown")))]
extern crate std;

/// Slot arena and index-linked bucket lists.
pub(crate) mod list;

/// Entry table and ordered frequency buckets.
pub(crate) mod index;

/// Cache configuration structures.
pub mod config;

/// Error types.
pub mod error;

/// Least Frequently Used (LFU) cache implementation.
///
/// Provides a fixed-capacity cache that evicts the least frequently used
/// entry, oldest first among equal frequencies.
pub mod lfu;

/// Cache metrics system.
pub mod metrics;

/// Concurrent cache implementation.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use error::InvariantError;
pub use index::Iter;
pub use lfu::{FrequencyCache, PutOutcome};
pub use metrics::{CacheMetrics, CoreCacheMetrics, FrequencyCacheMetrics};

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentFrequencyCache;
