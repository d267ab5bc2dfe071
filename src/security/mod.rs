//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (per-credential window check, X-RateLimit headers)
//!     → Pass to the pipeline entry point
//! ```
//!
//! # Design Decisions
//! - Fail closed: a rejected request never reaches the pipeline
//! - No trust in client input: anonymous callers are keyed by IP

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimiter};
