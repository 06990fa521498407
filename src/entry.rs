use std::sync::Arc;
use std::time::{Duration, Instant};

/// A container for a value in the cache, holding all necessary metadata.
#[derive(Debug)]
pub(crate) struct CacheEntry<V> {
  /// The user's value, wrapped in an Arc for shared ownership.
  value: Arc<V>,
  /// When the entry was created.
  pub(crate) created_at: Instant,
  /// When the entry expires. `None` means it never expires.
  pub(crate) expires_at: Option<Instant>,
  /// The labels attached at insertion time. Write-once; replacing the entry
  /// is the only way to change them.
  pub(crate) labels: Box<[Arc<str>]>,
  /// The last time the entry was returned as a hit.
  pub(crate) last_accessed: Instant,
  /// How many times the entry was returned as a hit.
  pub(crate) access_count: u64,
}

impl<V> CacheEntry<V> {
  /// Creates a new `CacheEntry`. A `ttl` of `None` means the entry never
  /// expires.
  pub(crate) fn new(value: V, ttl: Option<Duration>, labels: Box<[Arc<str>]>) -> Self {
    let now = Instant::now();
    Self {
      value: Arc::new(value),
      created_at: now,
      // checked_add: a TTL large enough to overflow the clock is "never".
      expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
      labels,
      last_accessed: now,
      access_count: 0,
    }
  }

  /// Returns a clone of the `Arc` containing the value.
  #[inline]
  pub(crate) fn value(&self) -> Arc<V> {
    self.value.clone()
  }

  /// Checks if the entry is expired at `now`.
  #[inline]
  pub(crate) fn is_expired(&self, now: Instant) -> bool {
    match self.expires_at {
      Some(expires_at) => now >= expires_at,
      None => false,
    }
  }

  /// Records a successful read.
  #[inline]
  pub(crate) fn record_access(&mut self, now: Instant) {
    self.access_count += 1;
    self.last_accessed = now;
  }

  /// Produces a diagnostic view of the entry's metadata.
  pub(crate) fn info(&self) -> EntryInfo {
    EntryInfo {
      created_at: self.created_at,
      expires_at: self.expires_at,
      last_accessed: self.last_accessed,
      access_count: self.access_count,
      labels: self.labels.to_vec(),
    }
  }
}

/// A diagnostic view of a single entry's metadata, detached from the entry
/// itself.
#[derive(Debug, Clone)]
pub struct EntryInfo {
  /// When the entry was created.
  pub created_at: Instant,
  /// When the entry expires; `None` means it never expires.
  pub expires_at: Option<Instant>,
  /// The last time the entry was returned as a hit (creation time if never
  /// read).
  pub last_accessed: Instant,
  /// How many times the entry was returned as a hit.
  pub access_count: u64,
  /// The labels attached at insertion time.
  pub labels: Vec<Arc<str>>,
}
