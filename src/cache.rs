use crate::entry::{CacheEntry, EntryInfo};
use crate::janitor::{self, Janitor};
use crate::stats::{Stats, StatsSnapshot};
use crate::store::{Lookup, Store};

use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use parking_lot::Mutex;

/// The internal, thread-safe core of the cache, shared by all handle clones.
pub(crate) struct CacheShared<K: Eq + Hash + Clone, V, H> {
  pub(crate) store: Arc<Mutex<Store<K, V, H>>>,
  pub(crate) stats: Arc<Stats>,
  pub(crate) default_ttl: Option<Duration>,
  pub(crate) janitor: Option<Janitor>,
}

impl<K: Eq + Hash + Clone, V, H> Drop for CacheShared<K, V, H> {
  fn drop(&mut self) {
    if let Some(janitor) = self.janitor.take() {
      janitor.stop();
    }
  }
}

/// A thread-safe cache with TTL expiry, LRU capacity eviction, and
/// label-based group invalidation.
///
/// `Cache` is a cheap handle over shared state: build one instance and
/// `clone` the handle wherever it is needed. The last handle to drop tears
/// the cache down, stopping the background sweep if one is running.
///
/// Values are stored in an `Arc<V>`, so reads return shared ownership
/// without requiring `V: Clone`.
pub struct Cache<K: Eq + Hash + Clone, V, H = ahash::RandomState> {
  pub(crate) shared: Arc<CacheShared<K, V, H>>,
}

impl<K: Eq + Hash + Clone, V, H> Clone for Cache<K, V, H> {
  fn clone(&self) -> Self {
    Self {
      shared: self.shared.clone(),
    }
  }
}

impl<K, V, H> Cache<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher,
{
  /// Fetches the value for `key`, returning a clone of the `Arc` if a live
  /// entry exists.
  ///
  /// A hit updates the entry's access metadata and moves it to the
  /// most-recent position. An entry whose TTL has elapsed is removed and
  /// counted as both a miss and an expiration; it is never returned as a
  /// hit.
  pub fn get(&self, key: &K) -> Option<Arc<V>> {
    let outcome = self.shared.store.lock().lookup(key, Instant::now());
    match outcome {
      Lookup::Hit(value) => {
        self.shared.stats.hits.fetch_add(1, Ordering::Relaxed);
        Some(value)
      }
      Lookup::Expired => {
        self.shared.stats.misses.fetch_add(1, Ordering::Relaxed);
        self.shared.stats.expirations.fetch_add(1, Ordering::Relaxed);
        None
      }
      Lookup::Miss => {
        self.shared.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
      }
    }
  }

  /// "Peeks" at a value without updating recency, access metadata, or any
  /// statistics counter. Expired entries read as absent.
  pub fn peek(&self, key: &K) -> Option<Arc<V>> {
    self.shared.store.lock().peek(key, Instant::now())
  }

  /// Returns `true` if a live, unexpired entry exists for `key`. Does not
  /// touch recency or statistics.
  pub fn contains(&self, key: &K) -> bool {
    self.shared.store.lock().contains(key, Instant::now())
  }

  /// Returns a diagnostic view of a live entry's metadata (creation and
  /// expiry times, access counters, labels). Like [`peek`](Cache::peek),
  /// this touches neither recency nor statistics.
  pub fn entry_info(&self, key: &K) -> Option<EntryInfo> {
    self.shared.store.lock().info(key, Instant::now())
  }

  /// Inserts `key` with the cache-wide default TTL and no labels.
  pub fn insert(&self, key: K, value: V) {
    self.insert_entry(key, value, None, Vec::new());
  }

  /// Inserts `key` with a specific TTL, overriding the cache-wide default.
  pub fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
    self.insert_entry(key, value, Some(ttl), Vec::new());
  }

  /// Inserts `key` with explicit TTL and labels.
  ///
  /// A `ttl` of `None` applies the cache-wide default (which may itself be
  /// absent, meaning the entry never expires). Labels are attached for the
  /// lifetime of the entry; overwriting the key is the only way to change
  /// them.
  ///
  /// Inserting a new key while the cache is at capacity first evicts
  /// least-recently-used entries until there is room. Overwriting an
  /// existing key replaces its value, TTL, and labels, moves it to the
  /// most-recent position, and never evicts.
  pub fn insert_full<L, S>(&self, key: K, value: V, ttl: Option<Duration>, labels: L)
  where
    L: IntoIterator<Item = S>,
    S: Into<Arc<str>>,
  {
    let labels = labels.into_iter().map(Into::into).collect();
    self.insert_entry(key, value, ttl, labels);
  }

  /// Removes the entry for `key`, returning `true` if one existed.
  /// Idempotent: removing an absent key is a no-op, not an error.
  pub fn invalidate(&self, key: &K) -> bool {
    let removed = self.shared.store.lock().remove(key);
    if removed {
      self.shared.stats.invalidations.fetch_add(1, Ordering::Relaxed);
    }
    removed
  }

  /// Removes every entry carrying `label`, returning the number removed.
  ///
  /// The whole group is removed under one critical section: a concurrent
  /// reader sees either all of the group or none of it.
  pub fn invalidate_by_label(&self, label: &str) -> usize {
    let removed = self.shared.store.lock().remove_label_group(label);
    if removed > 0 {
      self
        .shared
        .stats
        .invalidations
        .fetch_add(removed as u64, Ordering::Relaxed);
      debug!("invalidated {} entries with label '{}'", removed, label);
    }
    removed
  }

  /// Removes every entry carrying any of `labels`, returning the total
  /// number removed.
  pub fn invalidate_by_labels<I, S>(&self, labels: I) -> usize
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    labels
      .into_iter()
      .map(|label| self.invalidate_by_label(label.as_ref()))
      .sum()
  }

  /// Removes all entries. Statistics counters keep their cumulative values;
  /// the removed entries are counted as invalidations.
  pub fn clear(&self) {
    let removed = self.shared.store.lock().clear();
    if removed > 0 {
      self
        .shared
        .stats
        .invalidations
        .fetch_add(removed as u64, Ordering::Relaxed);
      debug!("cleared {} entries", removed);
    }
  }

  /// Removes every currently-expired entry now, without waiting for the
  /// background sweep. Returns the number removed.
  pub fn flush_expired(&self) -> usize {
    janitor::sweep_expired(&self.shared.store, &self.shared.stats)
  }

  /// Returns the cached value for `key`, computing and storing it with the
  /// cache defaults if absent.
  ///
  /// On a hit `init` is not invoked. On a miss `init` runs outside the
  /// cache's critical section, so two callers racing on the same key may
  /// both compute; the later insert wins. Per-key computation locks are
  /// deliberately not provided.
  pub fn get_with<F>(&self, key: K, init: F) -> Arc<V>
  where
    F: FnOnce() -> V,
  {
    self.get_with_full(key, None, std::iter::empty::<&str>(), init)
  }

  /// Like [`get_with`](Cache::get_with), with explicit TTL and labels for
  /// the entry created on a miss.
  pub fn get_with_full<F, L, S>(&self, key: K, ttl: Option<Duration>, labels: L, init: F) -> Arc<V>
  where
    F: FnOnce() -> V,
    L: IntoIterator<Item = S>,
    S: Into<Arc<str>>,
  {
    if let Some(value) = self.get(&key) {
      return value;
    }
    let value = init();
    let labels = labels.into_iter().map(Into::into).collect();
    self.insert_entry(key, value, ttl, labels)
  }

  /// Fallible variant of [`get_with`](Cache::get_with): an error from `init`
  /// is propagated unchanged and nothing is cached, so the next call
  /// retries the computation.
  pub fn try_get_with<F, E>(&self, key: K, init: F) -> Result<Arc<V>, E>
  where
    F: FnOnce() -> Result<V, E>,
  {
    self.try_get_with_full(key, None, std::iter::empty::<&str>(), init)
  }

  /// Fallible variant of [`get_with_full`](Cache::get_with_full).
  pub fn try_get_with_full<F, E, L, S>(
    &self,
    key: K,
    ttl: Option<Duration>,
    labels: L,
    init: F,
  ) -> Result<Arc<V>, E>
  where
    F: FnOnce() -> Result<V, E>,
    L: IntoIterator<Item = S>,
    S: Into<Arc<str>>,
  {
    if let Some(value) = self.get(&key) {
      return Ok(value);
    }
    let value = init()?;
    let labels = labels.into_iter().map(Into::into).collect();
    Ok(self.insert_entry(key, value, ttl, labels))
  }

  /// Returns an immutable point-in-time snapshot of the cache's statistics.
  /// Activity after the call never mutates a snapshot already returned.
  pub fn stats(&self) -> StatsSnapshot {
    let (size, capacity, label_count) = {
      let store = self.shared.store.lock();
      (store.len(), store.capacity(), store.label_count())
    };
    self.shared.stats.snapshot(size, capacity, label_count)
  }

  /// Zeroes the cumulative statistics counters.
  pub fn reset_stats(&self) {
    self.shared.stats.reset();
  }

  /// The number of live entries.
  pub fn len(&self) -> usize {
    self.shared.store.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// The configured capacity (`usize::MAX` for an unbounded cache).
  pub fn capacity(&self) -> usize {
    self.shared.store.lock().capacity()
  }

  /// Central insert path. Applies the default TTL, stores the entry, and
  /// records insert/eviction statistics. Returns the stored value's `Arc`
  /// so memoization callers avoid a second lookup.
  fn insert_entry(&self, key: K, value: V, ttl: Option<Duration>, labels: Vec<Arc<str>>) -> Arc<V> {
    let ttl = ttl.or(self.shared.default_ttl);
    let entry = CacheEntry::new(value, ttl, labels.into_boxed_slice());
    let stored = entry.value();

    let evicted = self.shared.store.lock().insert(key, entry);

    self.shared.stats.inserts.fetch_add(1, Ordering::Relaxed);
    if evicted > 0 {
      self.shared.stats.evictions.fetch_add(evicted, Ordering::Relaxed);
    }
    stored
  }
}

impl<K, V, H> fmt::Debug for Cache<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Cache")
      .field("default_ttl", &self.shared.default_ttl)
      .field("stats", &self.stats())
      .finish_non_exhaustive()
  }
}
