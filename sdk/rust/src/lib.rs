//! Rust SDK for the SVG optimizer service.

pub mod client;

pub use client::{OptimizeRequest, OptimizeResponse, OptimizerClient};
