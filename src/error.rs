use std::fmt;

/// Errors that can occur when building a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
  /// The cache was configured with a capacity of zero, which is not allowed
  /// for a bounded cache. Use `unbounded()` for an unbounded cache.
  ZeroCapacity,
  /// The cache was configured with a default time-to-live of zero. Entries
  /// that should never expire are expressed by not setting a TTL at all.
  ZeroTimeToLive,
  /// The background sweep was configured with an interval of zero. Leave the
  /// sweep unconfigured to disable it.
  ZeroSweepInterval,
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::ZeroCapacity => write!(f, "bounded cache capacity cannot be zero"),
      BuildError::ZeroTimeToLive => write!(f, "default time-to-live cannot be zero"),
      BuildError::ZeroSweepInterval => write!(f, "sweep interval cannot be zero"),
    }
  }
}

impl std::error::Error for BuildError {}
