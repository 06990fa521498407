use labelcache::CacheBuilder;
use std::thread;
use std::time::Duration;

const TINY_TTL: Duration = Duration::from_millis(60);
const SWEEP_TICK: Duration = Duration::from_millis(20);
// Generous margin so slow CI machines still see at least one sweep pass.
const SLEEP_MARGIN: Duration = Duration::from_millis(200);

#[test]
fn test_sweep_removes_expired_entries_without_reads() {
  let cache = CacheBuilder::<String, i32>::new()
    .default_ttl(TINY_TTL)
    .sweep_interval(SWEEP_TICK)
    .build()
    .unwrap();

  for i in 0..20 {
    cache.insert(format!("key{}", i), i);
  }
  assert_eq!(cache.len(), 20);

  thread::sleep(TINY_TTL + SLEEP_MARGIN);

  // No foreground read happened; the janitor alone must have swept.
  assert_eq!(cache.len(), 0);
  let stats = cache.stats();
  assert_eq!(stats.expirations, 20);
  assert_eq!(stats.evictions, 0);
  assert_eq!(stats.misses, 0, "sweeping is not a lookup");
}

#[test]
fn test_sweep_spares_unexpired_entries() {
  let cache = CacheBuilder::<String, i32>::new()
    .sweep_interval(SWEEP_TICK)
    .build()
    .unwrap();

  cache.insert_with_ttl("short".to_string(), 1, TINY_TTL);
  cache.insert("forever".to_string(), 2);
  cache.insert_with_ttl("long".to_string(), 3, Duration::from_secs(3600));

  thread::sleep(TINY_TTL + SLEEP_MARGIN);

  assert_eq!(cache.len(), 2);
  assert!(cache.contains(&"forever".to_string()));
  assert!(cache.contains(&"long".to_string()));
  assert_eq!(cache.stats().expirations, 1);
}

#[test]
fn test_teardown_with_running_sweep() {
  // Dropping the last handle must stop the sweep cleanly.
  let cache = CacheBuilder::<String, i32>::new()
    .default_ttl(TINY_TTL)
    .sweep_interval(SWEEP_TICK)
    .build()
    .unwrap();
  cache.insert("key".to_string(), 1);
  drop(cache);
  thread::sleep(SWEEP_TICK * 3);
}
