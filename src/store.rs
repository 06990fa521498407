use crate::entry::CacheEntry;
use crate::labels::LabelIndex;
use crate::recency::RecencyList;

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;
use std::time::Instant;

/// The outcome of a single lookup, before statistics are recorded.
pub(crate) enum Lookup<V> {
  /// A live entry was found; access metadata and recency were updated.
  Hit(Arc<V>),
  /// An entry was found but its TTL had elapsed; it has been removed.
  Expired,
  /// No entry for the key.
  Miss,
}

/// The cache's single consistency domain.
///
/// Owns the key map, the recency list, and the label index, and is the only
/// place any of the three is mutated. Every method leaves the invariant
/// intact: a key is in the map iff it is in the recency list, and each label
/// on its entry maps back to it in the index. Callers serialize access with
/// one lock around the whole `Store`.
#[derive(Debug)]
pub(crate) struct Store<K: Eq + Hash + Clone, V, H> {
  map: HashMap<K, CacheEntry<V>, H>,
  recency: RecencyList<K>,
  labels: LabelIndex<K>,
  capacity: usize,
}

impl<K, V, H> Store<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher,
{
  pub(crate) fn new(capacity: usize, hasher: H) -> Self {
    Self {
      map: HashMap::with_hasher(hasher),
      recency: RecencyList::new(),
      labels: LabelIndex::new(),
      capacity,
    }
  }

  /// The number of live entries.
  pub(crate) fn len(&self) -> usize {
    self.map.len()
  }

  /// The number of distinct labels currently indexed.
  pub(crate) fn label_count(&self) -> usize {
    self.labels.len()
  }

  pub(crate) fn capacity(&self) -> usize {
    self.capacity
  }

  /// Looks up `key`, updating access metadata and recency on a hit.
  ///
  /// The expiry check precedes everything else: an expired entry is removed
  /// along the same path as an explicit removal and reported as `Expired`,
  /// never as a hit.
  pub(crate) fn lookup(&mut self, key: &K, now: Instant) -> Lookup<V> {
    let live_value = match self.map.get_mut(key) {
      None => return Lookup::Miss,
      Some(entry) => {
        if entry.is_expired(now) {
          None
        } else {
          entry.record_access(now);
          Some(entry.value())
        }
      }
    };

    match live_value {
      Some(value) => {
        self.recency.move_to_front(key);
        Lookup::Hit(value)
      }
      None => {
        self.remove(key);
        Lookup::Expired
      }
    }
  }

  /// Reads a value without touching recency, access metadata, or expiry
  /// state. Expired entries are reported as absent but left in place for the
  /// regular removal paths.
  pub(crate) fn peek(&self, key: &K, now: Instant) -> Option<Arc<V>> {
    self.map.get(key).and_then(|entry| {
      if entry.is_expired(now) {
        None
      } else {
        Some(entry.value())
      }
    })
  }

  pub(crate) fn contains(&self, key: &K, now: Instant) -> bool {
    self
      .map
      .get(key)
      .map_or(false, |entry| !entry.is_expired(now))
  }

  /// Produces a metadata view of a live entry, without touching recency or
  /// access metadata.
  pub(crate) fn info(&self, key: &K, now: Instant) -> Option<crate::entry::EntryInfo> {
    self.map.get(key).and_then(|entry| {
      if entry.is_expired(now) {
        None
      } else {
        Some(entry.info())
      }
    })
  }

  /// Inserts or overwrites `key`, returning how many entries were evicted to
  /// stay under capacity.
  ///
  /// Overwriting never evicts: the key already occupies its slot. A new key
  /// evicts least-recently-used entries first until there is room. Either
  /// way the key ends up at the most-recent position.
  pub(crate) fn insert(&mut self, key: K, entry: CacheEntry<V>) -> u64 {
    if let Some(old) = self.map.remove(&key) {
      // Old labels must come out of the index before the new ones go in, so
      // a label shared by both versions survives the swap.
      self.labels.remove(&key, &old.labels);
      self.labels.add(&key, &entry.labels);
      self.recency.move_to_front(&key);
      self.map.insert(key, entry);
      return 0;
    }

    let mut evicted = 0;
    while self.map.len() >= self.capacity {
      if self.evict_one().is_none() {
        break;
      }
      evicted += 1;
    }

    self.labels.add(&key, &entry.labels);
    self.recency.push_front(key.clone());
    self.map.insert(key, entry);
    evicted
  }

  /// Removes `key` from all three structures. Returns whether it was present.
  pub(crate) fn remove(&mut self, key: &K) -> bool {
    match self.map.remove(key) {
      Some(entry) => {
        self.recency.remove(key);
        self.labels.remove(key, &entry.labels);
        true
      }
      None => false,
    }
  }

  /// Removes the least-recently-used entry, returning its key.
  ///
  /// Purely recency-driven: expiry is never consulted here.
  pub(crate) fn evict_one(&mut self) -> Option<K> {
    let key = self.recency.pop_back()?;
    if let Some(entry) = self.map.remove(&key) {
      self.labels.remove(&key, &entry.labels);
    }
    Some(key)
  }

  /// Removes every entry carrying `label`, returning how many were removed.
  ///
  /// The key set is detached from the index first, then each key is removed,
  /// so the iteration never walks a set that is being mutated.
  pub(crate) fn remove_label_group(&mut self, label: &str) -> usize {
    let keys = match self.labels.take(label) {
      Some(keys) => keys,
      None => return 0,
    };

    let mut removed = 0;
    for key in keys {
      if let Some(entry) = self.map.remove(&key) {
        self.recency.remove(&key);
        // The taken label is already gone from the index; this detaches any
        // other labels the entry carried.
        self.labels.remove(&key, &entry.labels);
        removed += 1;
      }
    }
    removed
  }

  /// Removes everything, returning how many entries were dropped.
  pub(crate) fn clear(&mut self) -> usize {
    let removed = self.map.len();
    self.map.clear();
    self.recency.clear();
    self.labels.clear();
    removed
  }

  /// Removes up to `limit` expired entries, returning how many were removed.
  ///
  /// Bounded so sweep callers can release the lock between batches instead
  /// of holding it for a full scan.
  pub(crate) fn remove_expired_batch(&mut self, limit: usize, now: Instant) -> usize {
    let expired: Vec<K> = self
      .map
      .iter()
      .filter(|(_, entry)| entry.is_expired(now))
      .take(limit)
      .map(|(key, _)| key.clone())
      .collect();

    for key in &expired {
      self.remove(key);
    }
    expired.len()
  }

  /// Asserts referential consistency across the three structures.
  #[cfg(test)]
  pub(crate) fn check_invariants(&self) {
    assert_eq!(
      self.map.len(),
      self.recency.len(),
      "map and recency list must track the same keys"
    );
    for (key, entry) in self.map.iter() {
      assert!(
        self.recency.contains(key),
        "key present in map but missing from recency list"
      );
      for label in entry.labels.iter() {
        let keys = self
          .labels
          .keys_for(label)
          .expect("label on a live entry missing from index");
        assert!(
          keys.contains(key),
          "label on a live entry does not map back to its key"
        );
      }
    }
    for (label, keys) in self.labels.iter() {
      assert!(!keys.is_empty(), "label index holds an empty set");
      for key in keys {
        let entry = self
          .map
          .get(key)
          .expect("indexed key is not a live entry");
        assert!(
          entry.labels.iter().any(|l| l == label),
          "indexed key does not carry the label"
        );
      }
    }
  }
}
