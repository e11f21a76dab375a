//! TTL cache for Sankofa lookups.
//!
//! Generic in-memory cache with configurable capacity and expiration. Keys
//! are exact strings; no case folding is applied.

mod cache;

pub use cache::{CacheConfig, CacheStats, TtlCache};
