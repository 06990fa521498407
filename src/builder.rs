use crate::cache::{Cache, CacheShared};
use crate::error::BuildError;
use crate::janitor::{Janitor, JanitorContext};
use crate::stats::Stats;
use crate::store::Store;

use core::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// A builder for creating [`Cache`] instances.
///
/// Defaults: unbounded capacity, no default TTL (entries never expire), and
/// no background sweep (expiry is detected lazily on access). Each of the
/// three is opt-in, and a zero value for any of them is a configuration
/// error rather than a sentinel.
pub struct CacheBuilder<K, V, H = ahash::RandomState> {
  capacity: usize,
  default_ttl: Option<Duration>,
  sweep_interval: Option<Duration>,
  hasher: H,
  _key_marker: PhantomData<K>,
  _value_marker: PhantomData<V>,
}

impl<K, V, H> fmt::Debug for CacheBuilder<K, V, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheBuilder")
      .field("capacity", &self.capacity)
      .field("default_ttl", &self.default_ttl)
      .field("sweep_interval", &self.sweep_interval)
      .finish_non_exhaustive()
  }
}

// --- General Configuration Methods ---
impl<K, V, H> CacheBuilder<K, V, H> {
  /// Sets the maximum number of live entries. When a new key would exceed
  /// this bound, least-recently-used entries are evicted first.
  ///
  /// Zero is rejected at build time; use [`unbounded`](Self::unbounded) for
  /// a cache without a capacity bound.
  pub fn capacity(mut self, capacity: usize) -> Self {
    self.capacity = capacity;
    self
  }

  /// Sets the cache to be "unbounded".
  pub fn unbounded(mut self) -> Self {
    self.capacity = usize::MAX;
    self
  }

  /// Sets the TTL applied to entries inserted without an explicit one.
  /// Without a default, such entries never expire.
  pub fn default_ttl(mut self, duration: Duration) -> Self {
    self.default_ttl = Some(duration);
    self
  }

  /// Enables the background sweep, which proactively removes expired
  /// entries once per `duration`. Without it, expired entries are removed
  /// lazily when read (or via [`Cache::flush_expired`]), so entries that
  /// are never read again linger until evicted.
  pub fn sweep_interval(mut self, duration: Duration) -> Self {
    self.sweep_interval = Some(duration);
    self
  }

  /// Sets the hasher for the cache's key map.
  pub fn hasher(mut self, hasher: H) -> Self {
    self.hasher = hasher;
    self
  }
}

// --- Default Constructor ---
impl<K, V, H: BuildHasher + Default> CacheBuilder<K, V, H> {
  /// Creates a new `CacheBuilder` with default settings.
  pub fn new() -> Self {
    Self {
      capacity: usize::MAX,
      default_ttl: None,
      sweep_interval: None,
      hasher: H::default(),
      _key_marker: PhantomData,
      _value_marker: PhantomData,
    }
  }
}

impl<K, V> Default for CacheBuilder<K, V, ahash::RandomState> {
  fn default() -> Self {
    Self::new()
  }
}

// --- Build Methods ---
// This impl block carries the full set of bounds required to construct the
// cache, including the `Send + 'static` bounds the sweep thread needs.
impl<K, V, H> CacheBuilder<K, V, H>
where
  K: Eq + Hash + Clone + Send + 'static,
  V: Send + Sync + 'static,
  H: BuildHasher + Send + 'static,
{
  /// Builds the cache, spawning the background sweep if one was configured.
  pub fn build(self) -> Result<Cache<K, V, H>, BuildError> {
    self.validate()?;

    let store = Arc::new(Mutex::new(Store::new(self.capacity, self.hasher)));
    let stats = Arc::new(Stats::new());

    let janitor = self.sweep_interval.map(|tick_interval| {
      Janitor::spawn(
        JanitorContext {
          store: Arc::clone(&store),
          stats: Arc::clone(&stats),
        },
        tick_interval,
      )
    });

    Ok(Cache {
      shared: Arc::new(CacheShared {
        store,
        stats,
        default_ttl: self.default_ttl,
        janitor,
      }),
    })
  }

  /// Validates the builder configuration.
  pub(crate) fn validate(&self) -> Result<(), BuildError> {
    if self.capacity == 0 {
      return Err(BuildError::ZeroCapacity);
    }
    if self.default_ttl == Some(Duration::ZERO) {
      return Err(BuildError::ZeroTimeToLive);
    }
    if self.sweep_interval == Some(Duration::ZERO) {
      return Err(BuildError::ZeroSweepInterval);
    }
    Ok(())
  }
}
