use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_utils::CachePadded;

/// A thread-safe, internal statistics collector for the cache.
/// All fields are atomic to allow for lock-free updates.
#[derive(Debug)]
pub(crate) struct Stats {
  // --- Hit/Miss Ratios ---
  pub(crate) hits: CachePadded<AtomicU64>,
  pub(crate) misses: CachePadded<AtomicU64>,

  // --- Throughput ---
  pub(crate) inserts: CachePadded<AtomicU64>,
  pub(crate) invalidations: CachePadded<AtomicU64>,

  // --- Entry destruction, by trigger ---
  /// Capacity-driven removals.
  pub(crate) evictions: CachePadded<AtomicU64>,
  /// Time-driven removals, lazy or swept.
  pub(crate) expirations: CachePadded<AtomicU64>,

  created_at: Instant,
}

impl Stats {
  pub(crate) fn new() -> Self {
    Self {
      hits: CachePadded::new(AtomicU64::new(0)),
      misses: CachePadded::new(AtomicU64::new(0)),
      inserts: CachePadded::new(AtomicU64::new(0)),
      invalidations: CachePadded::new(AtomicU64::new(0)),
      evictions: CachePadded::new(AtomicU64::new(0)),
      expirations: CachePadded::new(AtomicU64::new(0)),
      created_at: Instant::now(),
    }
  }

  /// Creates a point-in-time snapshot of the current statistics.
  ///
  /// `size`, `capacity` and `label_count` are read by the caller under the
  /// core lock; the counters are loaded here with relaxed ordering.
  pub(crate) fn snapshot(&self, size: usize, capacity: usize, label_count: usize) -> StatsSnapshot {
    let hits = self.hits.load(Ordering::Relaxed);
    let misses = self.misses.load(Ordering::Relaxed);
    let total_lookups = hits + misses;

    StatsSnapshot {
      hits,
      misses,
      hit_rate: if total_lookups == 0 {
        0.0
      } else {
        hits as f64 / total_lookups as f64
      },
      inserts: self.inserts.load(Ordering::Relaxed),
      invalidations: self.invalidations.load(Ordering::Relaxed),
      evictions: self.evictions.load(Ordering::Relaxed),
      expirations: self.expirations.load(Ordering::Relaxed),
      size,
      capacity,
      label_count,
      uptime_secs: self.created_at.elapsed().as_secs(),
    }
  }

  /// Zeroes the cumulative counters. Uptime keeps running from creation.
  pub(crate) fn reset(&self) {
    self.hits.store(0, Ordering::Relaxed);
    self.misses.store(0, Ordering::Relaxed);
    self.inserts.store(0, Ordering::Relaxed);
    self.invalidations.store(0, Ordering::Relaxed);
    self.evictions.store(0, Ordering::Relaxed);
    self.expirations.store(0, Ordering::Relaxed);
  }
}

/// A point-in-time, public-facing snapshot of the cache's statistics.
///
/// A snapshot is an owned value: activity after `stats()` returns never
/// mutates a snapshot already handed out.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
  /// The number of successful lookups.
  pub hits: u64,
  /// The number of failed lookups, including expired entries.
  pub misses: u64,
  /// `hits / (hits + misses)`, or `0.0` before any lookup.
  pub hit_rate: f64,
  /// The total number of insertions, including overwrites.
  pub inserts: u64,
  /// The number of entries removed by explicit invalidation (single key,
  /// label group, or clear).
  pub invalidations: u64,
  /// The number of entries evicted to enforce the capacity bound.
  pub evictions: u64,
  /// The number of entries removed because their TTL elapsed.
  pub expirations: u64,
  /// The number of live entries at snapshot time.
  pub size: usize,
  /// The configured capacity (`usize::MAX` for an unbounded cache).
  pub capacity: usize,
  /// The number of distinct labels in the index at snapshot time.
  pub label_count: usize,
  /// Seconds since the cache was created.
  pub uptime_secs: u64,
}

impl fmt::Debug for StatsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StatsSnapshot")
      .field("hits", &self.hits)
      .field("misses", &self.misses)
      .field("hit_rate", &format!("{:.2}%", self.hit_rate * 100.0))
      .field("inserts", &self.inserts)
      .field("invalidations", &self.invalidations)
      .field("evictions", &self.evictions)
      .field("expirations", &self.expirations)
      .field("size", &self.size)
      .field("capacity", &self.capacity)
      .field("label_count", &self.label_count)
      .field("uptime_secs", &self.uptime_secs)
      .finish()
  }
}
