//! TTL cache for HOLONET.
//!
//! Generic in-memory key/value store with per-entry expiration, lazy
//! eviction on read and an optional periodic sweep task.

mod cache;

pub use cache::{CacheConfig, CacheStats, TtlCache};
