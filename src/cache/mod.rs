//! Result caching subsystem.
//!
//! # Data Flow
//! ```text
//! (document, options)
//!     → key.rs (blake3 content+options hash)
//!     → lru.rs (bounded store, hit/miss counters, LRU eviction)
//!     → CacheEntry clone handed back to the pipeline
//! ```
//!
//! # Design Decisions
//! - Content-addressed: identical input and options share one entry across
//!   all callers
//! - Pure optimization: every miss is resolvable by the full pipeline
//! - Concurrent misses for one key may both compute and both write; the
//!   writes are idempotent, last one wins

pub mod key;
pub mod lru;

pub use key::CacheKey;
pub use lru::{CacheEntry, CacheStats, OptimizationCache};
