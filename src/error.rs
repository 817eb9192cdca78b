//! Error types.
//!
//! A correct cache never produces an error from its public operations:
//! misses are `None` and writes to a zero-capacity cache are reported through
//! [`PutOutcome::Rejected`](crate::PutOutcome::Rejected). The only error type
//! is [`InvariantError`], returned by the `check_invariants` methods that walk
//! the whole frequency index and verify it against the entry table.

use core::fmt;

/// Returned when the frequency index and the entry table disagree.
///
/// Carries a static description of the violated invariant and, when the
/// failure is tied to one bucket, the frequency of that bucket.
///
/// # Examples
///
/// ```
/// use frequency_cache::FrequencyCache;
///
/// let mut cache = FrequencyCache::new(4);
/// cache.put("a", 1);
/// cache.get(&"a");
/// assert!(cache.check_invariants().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvariantError {
    message: &'static str,
    frequency: Option<usize>,
}

impl InvariantError {
    pub(crate) const fn new(message: &'static str) -> Self {
        InvariantError {
            message,
            frequency: None,
        }
    }

    pub(crate) const fn at_frequency(message: &'static str, frequency: usize) -> Self {
        InvariantError {
            message,
            frequency: Some(frequency),
        }
    }

    /// Description of the invariant that failed.
    #[inline]
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Frequency of the bucket where the failure was detected, if any.
    #[inline]
    pub fn frequency(&self) -> Option<usize> {
        self.frequency
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frequency index invariant violated: {}", self.message)?;
        if let Some(frequency) = self.frequency {
            write!(f, " (bucket {frequency})")?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvariantError {}
