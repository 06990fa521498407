use crate::stats::Stats;
use crate::store::Store;

use std::hash::{BuildHasher, Hash};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::trace;
use parking_lot::Mutex;

/// The max number of expired entries removed per lock acquisition during a
/// sweep. Between batches the lock is released so foreground callers are
/// never starved by a long scan.
pub(crate) const SWEEP_BATCH_LIMIT: usize = 64;

/// A context object holding the thread-safe parts of the cache that the
/// janitor needs to access.
pub(crate) struct JanitorContext<K: Eq + Hash + Clone, V, H> {
  pub(crate) store: Arc<Mutex<Store<K, V, H>>>,
  pub(crate) stats: Arc<Stats>,
}

/// The background task responsible for proactively removing expired entries.
pub(crate) struct Janitor {
  handle: JoinHandle<()>, // When janitor is dropped, thread is exited
  stop_flag: Arc<AtomicBool>,
}

impl Janitor {
  /// Spawns a new janitor thread that sweeps once per `tick_interval`.
  pub(crate) fn spawn<K, V, H>(context: JanitorContext<K, V, H>, tick_interval: Duration) -> Self
  where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + Sync + 'static,
    H: BuildHasher + Send + 'static,
  {
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_clone = stop_flag.clone();

    let handle = thread::spawn(move || {
      while !stop_clone.load(Ordering::Relaxed) {
        let sleep_start = Instant::now();

        sweep_expired(&context.store, &context.stats);

        // Sleep for the remaining duration of the tick interval.
        if let Some(remaining) = tick_interval.checked_sub(sleep_start.elapsed()) {
          thread::sleep(remaining);
        }
      }
    });

    Self { handle, stop_flag }
  }

  /// Signals the janitor thread to stop.
  pub(crate) fn stop(self) {
    self.stop_flag.store(true, Ordering::Relaxed);
  }
}

/// Removes every currently-expired entry in bounded batches, re-acquiring the
/// store lock between batches. Shared by the janitor tick and the foreground
/// `flush_expired` path. Returns the number of entries removed.
pub(crate) fn sweep_expired<K, V, H>(store: &Mutex<Store<K, V, H>>, stats: &Stats) -> usize
where
  K: Eq + Hash + Clone,
  H: BuildHasher,
{
  let mut total = 0;
  loop {
    let removed = store
      .lock()
      .remove_expired_batch(SWEEP_BATCH_LIMIT, Instant::now());
    total += removed;
    if removed < SWEEP_BATCH_LIMIT {
      break;
    }
  }

  if total > 0 {
    stats.expirations.fetch_add(total as u64, Ordering::Relaxed);
    trace!("sweep removed {} expired entries", total);
  }
  total
}
