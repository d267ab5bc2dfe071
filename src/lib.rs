//! SVG Optimizer Service Library

pub mod admin;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod sanitize;
pub mod security;
pub mod transform;

pub use config::schema::OptimizerConfig;
pub use error::PipelineError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{OptimizeJob, OptimizeService, OptimizeSummary};
