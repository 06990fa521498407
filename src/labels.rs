use std::hash::Hash;
use std::sync::Arc;

use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};

/// An index from label to the set of keys currently carrying that label.
///
/// A key may appear under several labels at once. Sets that become empty are
/// pruned immediately, so the index never holds a label with no keys.
#[derive(Debug)]
pub(crate) struct LabelIndex<K> {
  index: HashMap<Arc<str>, HashSet<K>>,
}

impl<K: Eq + Hash + Clone> LabelIndex<K> {
  pub(crate) fn new() -> Self {
    Self {
      index: HashMap::new(),
    }
  }

  /// The number of distinct labels currently indexed.
  pub(crate) fn len(&self) -> usize {
    self.index.len()
  }

  /// Registers `key` under each label in `labels`.
  pub(crate) fn add(&mut self, key: &K, labels: &[Arc<str>]) {
    for label in labels {
      self
        .index
        .entry(label.clone())
        .or_insert_with(HashSet::new)
        .insert(key.clone());
    }
  }

  /// Unregisters `key` from each label in `labels`, pruning emptied sets.
  pub(crate) fn remove(&mut self, key: &K, labels: &[Arc<str>]) {
    for label in labels {
      if let Some(keys) = self.index.get_mut(label) {
        keys.remove(key);
        if keys.is_empty() {
          self.index.remove(label);
        }
      }
    }
  }

  /// Detaches and returns the whole key set for `label`, if any.
  ///
  /// Taking the set out first lets the caller remove each key without
  /// mutating the collection it is iterating.
  pub(crate) fn take(&mut self, label: &str) -> Option<HashSet<K>> {
    self.index.remove(label)
  }

  pub(crate) fn clear(&mut self) {
    self.index.clear();
  }

  #[cfg(test)]
  pub(crate) fn keys_for(&self, label: &str) -> Option<&HashSet<K>> {
    self.index.get(label)
  }

  #[cfg(test)]
  pub(crate) fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &HashSet<K>)> {
    self.index.iter()
  }
}
