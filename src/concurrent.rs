//! Concurrent Cache Implementation
//!
//! A thread-safe frequency cache built from independent segments, each a
//! single-threaded LFU segment behind its own `parking_lot::Mutex`. Keys are
//! assigned to a segment by hash, and every operation locks only that segment.
//!
//! ## Why Mutex Instead of RwLock?
//!
//! A `get` raises the entry's frequency and relinks it into another bucket,
//! so every read mutates the segment and needs exclusive access anyway.
//! Parallelism comes from segmentation: different keys can be accessed at the
//! same time when they hash to different segments.
//!
//! ## Eviction Scope
//!
//! Eviction decisions are made per segment. With one segment the cache is
//! a globally locked LFU cache with exact semantics; with more segments the
//! victim is the least frequently used entry *of the segment the new key hashes
//! to*.
//!
//! # Example
//!
//! ```
//! use frequency_cache::concurrent::ConcurrentFrequencyCache;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(ConcurrentFrequencyCache::new(1000));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..100 {
//!                 let key = format!("key_{t}_{i}");
//!                 cache.put(key.clone(), i);
//!                 let _ = cache.get(&key);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 400);
//! ```

mod lfu;

pub use self::lfu::ConcurrentFrequencyCache;

/// Returns the default number of segments.
#[inline]
pub fn default_segment_count() -> usize {
    16
}
