//! Sanitization subsystem.
//!
//! # Data Flow
//! ```text
//! Untrusted document:
//!     → patterns.rs (compiled scanning regexes, shared)
//!     → sanitizer.rs (destructive removal, per-category issues)
//!     → auditor.rs (read-only warnings for no-mutation callers)
//! ```
//!
//! # Design Decisions
//! - Bounded pattern scanning instead of DOM construction
//! - Sanitizer and auditor share one compiled pattern set
//! - Obfuscated payloads split across tags are an accepted risk of the
//!   scanning approach; the public contract would survive a tree-based
//!   replacement

pub mod auditor;
pub mod patterns;
pub mod sanitizer;

pub use auditor::audit;
pub use sanitizer::{sanitize, SanitizeOptions, SanitizeOutcome};
