//! Pipeline error taxonomy.
//!
//! # Responsibilities
//! - Define the error categories surfaced at the pipeline boundary
//! - Carry enough structure for HTTP status mapping and rate-limit headers
//!
//! # Design Decisions
//! - Validation and size errors carry fixed, user-facing messages
//! - Engine failures are propagated as-is, never retried
//! - HTTP conversion lives in `http::response`, not here

use thiserror::Error;

use crate::pipeline::validator::format_bytes;

/// Errors produced by the optimization pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    /// Content is empty or does not start with an SVG root tag or XML prolog.
    #[error("invalid SVG: content must begin with <svg or an <?xml prolog")]
    InvalidMarkup,

    /// Content exceeds the configured byte limit.
    #[error("file too large: {} exceeds the {} limit", format_bytes(*.size), format_bytes(*.limit))]
    PayloadTooLarge {
        /// Measured size in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// A credential exhausted its per-minute request budget.
    #[error("rate limit exceeded: retry in {retry_after_secs}s")]
    RateLimitExceeded {
        /// Whole seconds until the current window resets.
        retry_after_secs: u64,
        /// The credential's configured per-minute limit.
        limit: u32,
    },

    /// The external optimization engine reported a failure.
    #[error("optimization failed: {0}")]
    Optimization(String),
}
