//! Optimization engine seam.
//!
//! # Responsibilities
//! - Define the trait the pipeline calls to reduce a document
//! - Provide a minimal built-in reducer so the service runs standalone
//!
//! # Design Decisions
//! - The engine is a black box to the pipeline: one call per cache miss,
//!   failures surface immediately, no retry
//! - The trait is synchronous; the pipeline awaits nothing inside it and the
//!   built-in reducer is CPU-bound
//! - The default engine is constructed once, on first use

use std::sync::{Arc, LazyLock, OnceLock};

use regex::Regex;
use thiserror::Error;

/// Failure reported by an optimization engine.
#[derive(Debug, Error, Clone)]
#[error("{0}")]
pub struct ReduceError(pub String);

/// A structural markup reducer. Implementations must be lossless or
/// near-lossless; the pipeline trusts the returned bytes.
pub trait Reducer: Send + Sync {
    /// Engine name, for logs.
    fn name(&self) -> &'static str;

    /// Reduce a document, returning the optimized form.
    fn reduce(&self, svg: &str) -> Result<String, ReduceError>;
}

static XML_COMMENTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static INTER_TAG_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").unwrap());

/// Built-in reducer: strips XML comments and collapses whitespace between
/// tags. Deliberately conservative; a real engine plugs in behind [`Reducer`].
pub struct BasicReducer;

impl Reducer for BasicReducer {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn reduce(&self, svg: &str) -> Result<String, ReduceError> {
        let without_comments = XML_COMMENTS.replace_all(svg, "");
        let collapsed = INTER_TAG_WHITESPACE.replace_all(&without_comments, "><");
        Ok(collapsed.trim().to_string())
    }
}

static DEFAULT_ENGINE: OnceLock<Arc<BasicReducer>> = OnceLock::new();

/// The process-wide default engine, initialized on first call.
pub fn default_engine() -> Arc<dyn Reducer> {
    DEFAULT_ENGINE
        .get_or_init(|| {
            tracing::debug!(engine = "basic", "Initializing default optimization engine");
            Arc::new(BasicReducer)
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_comments_and_whitespace() {
        let svg = "<svg>\n  <!-- a comment -->\n  <rect/>\n</svg>";
        let reduced = BasicReducer.reduce(svg).unwrap();
        assert_eq!(reduced, "<svg><rect/></svg>");
    }

    #[test]
    fn test_idempotent() {
        let svg = "<svg> <circle r=\"1\"/> </svg>";
        let once = BasicReducer.reduce(svg).unwrap();
        let twice = BasicReducer.reduce(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_text_content_preserved() {
        let svg = "<svg><text>hello world</text></svg>";
        let reduced = BasicReducer.reduce(svg).unwrap();
        assert!(reduced.contains("hello world"));
    }

    #[test]
    fn test_default_engine_is_shared() {
        let a = default_engine();
        let b = default_engine();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
