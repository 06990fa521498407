use std::{collections::HashMap, hash::Hash};

use generational_arena::{Arena, Index};

#[derive(Debug)]
struct Node<K> {
  key: K,
  next: Option<Index>,
  prev: Option<Index>,
}

/// A self-contained recency list over live keys.
///
/// Head is the most-recently-used key, tail the least-recently-used; the tail
/// is always the next eviction victim. Order is maintained exactly in
/// operation order, so keys that were never touched keep their insertion
/// order and the earliest-inserted of them is evicted first.
#[derive(Debug)]
pub(crate) struct RecencyList<K: Eq + Hash + Clone> {
  // Arena stores all nodes contiguously.
  nodes: Arena<Node<K>>,
  // HashMap for O(1) lookup of a key to its node index in the arena.
  lookup: HashMap<K, Index>,
  head: Option<Index>,
  tail: Option<Index>,
}

impl<K: Eq + Hash + Clone> RecencyList<K> {
  pub(crate) fn new() -> Self {
    Self {
      nodes: Arena::new(),
      lookup: HashMap::new(),
      head: None,
      tail: None,
    }
  }

  // Helper to unlink a node from the list. Does not touch the arena or the
  // lookup map.
  fn unlink(&mut self, index: Index) {
    let node = &self.nodes[index];
    let prev_node_idx = node.prev;
    let next_node_idx = node.next;

    if let Some(prev_idx) = prev_node_idx {
      self.nodes[prev_idx].next = next_node_idx;
    } else {
      // We are unlinking the head of the list.
      self.head = next_node_idx;
    }

    if let Some(next_idx) = next_node_idx {
      self.nodes[next_idx].prev = prev_node_idx;
    } else {
      // We are unlinking the tail of the list.
      self.tail = prev_node_idx;
    }
  }

  // Helper to make an already-allocated node the new head.
  fn push_front_node(&mut self, index: Index) {
    let old_head_idx = self.head;
    self.nodes[index].next = old_head_idx;
    self.nodes[index].prev = None;
    self.head = Some(index);

    if let Some(old_head) = old_head_idx {
      self.nodes[old_head].prev = Some(index);
    }

    if self.tail.is_none() {
      self.tail = Some(index);
    }
  }

  pub(crate) fn contains(&self, key: &K) -> bool {
    self.lookup.contains_key(key)
  }

  pub(crate) fn len(&self) -> usize {
    self.lookup.len()
  }

  /// Inserts `key` at the most-recent position, or moves it there if it is
  /// already tracked.
  pub(crate) fn push_front(&mut self, key: K) {
    if self.lookup.contains_key(&key) {
      self.move_to_front(&key);
    } else {
      let new_node = Node {
        key: key.clone(),
        next: None,
        prev: None,
      };
      let index = self.nodes.insert(new_node);
      self.lookup.insert(key, index);
      self.push_front_node(index);
    }
  }

  /// Moves `key` to the most-recent position. No-op if it is not tracked.
  pub(crate) fn move_to_front(&mut self, key: &K) {
    if let Some(&index) = self.lookup.get(key) {
      // Only move if it's not already the head.
      if self.head != Some(index) {
        self.unlink(index);
        self.push_front_node(index);
      }
    }
  }

  /// Removes and returns the least-recently-used key.
  pub(crate) fn pop_back(&mut self) -> Option<K> {
    let tail_index = self.tail?;
    let key = self.nodes[tail_index].key.clone();
    self.remove(&key);
    Some(key)
  }

  /// Stops tracking `key`, returning whether it was tracked.
  pub(crate) fn remove(&mut self, key: &K) -> bool {
    if let Some(index) = self.lookup.remove(key) {
      self.unlink(index);
      self.nodes.remove(index);
      true
    } else {
      false
    }
  }

  pub(crate) fn clear(&mut self) {
    self.nodes.clear();
    self.lookup.clear();
    self.head = None;
    self.tail = None;
  }

  // A helper for tests, to get the order of keys from head to tail.
  #[cfg(test)]
  pub(crate) fn keys_as_vec(&self) -> Vec<K> {
    let mut keys = Vec::new();
    let mut current = self.head;
    while let Some(index) = current {
      keys.push(self.nodes[index].key.clone());
      current = self.nodes[index].next;
    }
    keys
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn new_list_is_empty() {
    let list = RecencyList::<i32>::new();
    assert!(list.keys_as_vec().is_empty(), "New list keys should be empty");
    assert_eq!(list.len(), 0);
    assert!(!list.contains(&123), "New list should not contain any key");
  }

  #[test]
  fn push_front_orders_newest_first() {
    let mut list = RecencyList::new();
    list.push_front(10);
    list.push_front(20);
    assert!(list.contains(&10));
    assert!(list.contains(&20));
    assert_eq!(list.len(), 2);
    assert_eq!(
      list.keys_as_vec(),
      vec![20, 10],
      "Newest key should be at the front"
    );
  }

  #[test]
  fn push_front_existing_key_moves_to_front() {
    let mut list = RecencyList::new();
    list.push_front(1);
    list.push_front(2);
    list.push_front(3);
    assert_eq!(list.keys_as_vec(), vec![3, 2, 1]);

    // Re-push '1' (the LRU key). It should move to the front.
    list.push_front(1);
    assert_eq!(list.len(), 3, "Length should not change");
    assert_eq!(
      list.keys_as_vec(),
      vec![1, 3, 2],
      "Existing key should move to front"
    );
  }

  #[test]
  fn move_to_front_from_middle() {
    let mut list = RecencyList::new();
    list.push_front(1);
    list.push_front(2);
    list.push_front(3);

    list.move_to_front(&2);
    assert_eq!(list.keys_as_vec(), vec![2, 3, 1]);

    // Moving the head is a no-op.
    list.move_to_front(&2);
    assert_eq!(list.keys_as_vec(), vec![2, 3, 1]);

    // Unknown keys are ignored.
    list.move_to_front(&99);
    assert_eq!(list.keys_as_vec(), vec![2, 3, 1]);
  }

  #[test]
  fn pop_back_returns_least_recent() {
    let mut list = RecencyList::new();
    list.push_front(1); // This will be the LRU key.
    list.push_front(2);
    list.push_front(3);

    assert_eq!(list.pop_back(), Some(1));
    assert!(!list.contains(&1), "Popped key should be removed");
    assert_eq!(list.keys_as_vec(), vec![3, 2]);

    assert_eq!(list.pop_back(), Some(2));
    assert_eq!(list.pop_back(), Some(3));
    assert_eq!(list.pop_back(), None, "pop_back on empty list returns None");
  }

  #[test]
  fn remove_key_from_middle() {
    let mut list = RecencyList::new();
    list.push_front(1);
    list.push_front(2);
    list.push_front(3);

    assert!(list.remove(&2));
    assert!(!list.contains(&2));
    assert_eq!(list.keys_as_vec(), vec![3, 1]);

    assert!(!list.remove(&2), "Second remove should report absence");
    assert_eq!(list.len(), 2, "Length should not change");
  }

  #[test]
  fn clear_resets_list() {
    let mut list = RecencyList::new();
    list.push_front(1);
    list.push_front(2);
    list.push_front(3);

    list.clear();

    assert!(list.keys_as_vec().is_empty());
    assert_eq!(list.len(), 0);
    assert!(!list.contains(&1));
    assert_eq!(list.pop_back(), None);
  }
}
