//! A thread-safe, in-process cache with TTL expiry, LRU eviction, and
//! label-based group invalidation.
//!
//! # Features
//! - **Bounded or unbounded**: least-recently-used entries are evicted when
//!   a configured capacity is reached.
//! - **TTL**: per-cache default and per-entry override; expired entries are
//!   removed lazily on access and, optionally, by a background sweep.
//! - **Labels**: entries may carry string labels, and every entry sharing a
//!   label can be invalidated in one atomic operation.
//! - **Memoization**: `get_with` returns the cached value or computes,
//!   stores, and returns a fresh one; the fallible `try_get_with` never
//!   caches a failed computation.
//! - **Non-Clone Support**: values live in an `Arc<V>`, avoiding `V: Clone`
//!   bounds.
//! - **Observability**: cumulative hit/miss/eviction/expiration statistics
//!   with immutable snapshots.
//!
//! The key map, the recency order, and the label index form one consistency
//! domain guarded by a single lock: no caller can ever observe an entry
//! present in one structure and missing from another.
//!
//! # Example
//!
//! ```
//! use labelcache::CacheBuilder;
//! use std::time::Duration;
//!
//! let cache = CacheBuilder::<String, u64>::new()
//!   .capacity(1024)
//!   .default_ttl(Duration::from_secs(600))
//!   .build()
//!   .unwrap();
//!
//! cache.insert_full("user:42".to_string(), 42, None, ["users"]);
//! assert_eq!(cache.get(&"user:42".to_string()).as_deref(), Some(&42));
//!
//! // A miss computes and stores; a hit returns without computing.
//! let hits = cache.get_with("expensive".to_string(), || 7 * 6);
//! assert_eq!(*hits, 42);
//!
//! // Drop every entry labelled "users" at once.
//! assert_eq!(cache.invalidate_by_label("users"), 1);
//! ```

// Public modules that form the API
pub mod builder;
pub mod error;
pub mod stats;

// Internal, crate-only modules
mod cache;
mod entry;
mod janitor;
mod labels;
mod recency;
mod store;

// Re-export the primary user-facing types for convenience
pub use builder::CacheBuilder;
pub use cache::Cache;
pub use entry::EntryInfo;
pub use error::BuildError;
pub use stats::StatsSnapshot;
