//! Ingestion and optimization pipeline.
//!
//! # Data Flow
//! ```text
//! Admitted request:
//!     → validator.rs (markup shape, byte-size ceiling)
//!     → cache lookup (hit: skip straight to the response)
//!     → sanitize/ (destructive) or auditor (read-only warnings)
//!     → engine.rs (external reduction, awaited)
//!     → transform/ (camelCase attribute names)
//!     → cache store → summary
//!     → history.rs (fire-and-forget accounting)
//! ```
//!
//! # Design Decisions
//! - The pipeline owns no HTTP concerns; every entry point builds an
//!   `OptimizeJob` and reads an `OptimizeSummary`
//! - Rate limiting sits in front of this module, at the serving layer

pub mod engine;
pub mod history;
pub mod service;
pub mod validator;

pub use engine::{default_engine, BasicReducer, ReduceError, Reducer};
pub use history::{HistoryLog, HistorySink, RequestRecord, TracingSink};
pub use service::{OptimizeJob, OptimizeService, OptimizeSummary};
