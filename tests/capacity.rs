use labelcache::{Cache, CacheBuilder};
use std::sync::Arc;

fn new_test_cache(capacity: usize) -> Cache<String, i32> {
  CacheBuilder::<String, i32>::new()
    .capacity(capacity)
    .build()
    .unwrap()
}

#[test]
fn test_size_never_exceeds_capacity() {
  let cache = new_test_cache(5);
  for i in 0..50 {
    cache.insert(format!("key{}", i), i);
    assert!(cache.len() <= 5, "size must never exceed capacity");
  }
  assert_eq!(cache.len(), 5);
  assert_eq!(cache.stats().evictions, 45);
}

#[test]
fn test_eviction_selects_least_recently_used() {
  let cache = new_test_cache(2);
  cache.insert("a".to_string(), 1);
  cache.insert("b".to_string(), 2);

  // Reading "a" makes "b" the LRU entry.
  assert!(cache.get(&"a".to_string()).is_some());

  cache.insert("c".to_string(), 3);
  assert!(
    cache.get(&"b".to_string()).is_none(),
    "the least-recently-used key should be evicted"
  );
  assert!(cache.get(&"a".to_string()).is_some());
  assert!(cache.get(&"c".to_string()).is_some());
  assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_untouched_keys_evict_in_insertion_order() {
  let cache = new_test_cache(3);
  cache.insert("first".to_string(), 1);
  cache.insert("second".to_string(), 2);
  cache.insert("third".to_string(), 3);

  // No key was ever read, so the earliest-inserted goes first.
  cache.insert("fourth".to_string(), 4);
  assert!(cache.peek(&"first".to_string()).is_none());

  cache.insert("fifth".to_string(), 5);
  assert!(cache.peek(&"second".to_string()).is_none());
  assert!(cache.peek(&"third".to_string()).is_some());
}

#[test]
fn test_get_refreshes_recency() {
  let cache = new_test_cache(3);
  cache.insert("a".to_string(), 1);
  cache.insert("b".to_string(), 2);
  cache.insert("c".to_string(), 3);

  // Touch "a", the coldest key; "b" becomes the victim.
  assert!(cache.get(&"a".to_string()).is_some());
  cache.insert("d".to_string(), 4);

  assert!(cache.peek(&"a".to_string()).is_some(), "read key survives");
  assert!(cache.peek(&"b".to_string()).is_none(), "colder key evicted");
}

#[test]
fn test_overwrite_at_capacity_does_not_evict() {
  let cache = new_test_cache(2);
  cache.insert("a".to_string(), 1);
  cache.insert("b".to_string(), 2);

  cache.insert("a".to_string(), 10);
  assert_eq!(cache.len(), 2);
  assert_eq!(cache.stats().evictions, 0, "overwrite must not evict");

  // The overwrite refreshed "a", so "b" is now the LRU entry.
  cache.insert("c".to_string(), 3);
  assert!(cache.peek(&"b".to_string()).is_none());
  assert_eq!(cache.get(&"a".to_string()), Some(Arc::new(10)));
}

#[test]
fn test_capacity_one() {
  let cache = new_test_cache(1);
  cache.insert("a".to_string(), 1);
  cache.insert("b".to_string(), 2);
  assert_eq!(cache.len(), 1);
  assert!(cache.peek(&"a".to_string()).is_none());
  assert_eq!(cache.peek(&"b".to_string()), Some(Arc::new(2)));
}

#[test]
fn test_unbounded_cache_never_evicts() {
  let cache = CacheBuilder::<String, i32>::new()
    .unbounded()
    .build()
    .unwrap();
  for i in 0..1000 {
    cache.insert(format!("key{}", i), i);
  }
  assert_eq!(cache.len(), 1000);
  assert_eq!(cache.stats().evictions, 0);
}
