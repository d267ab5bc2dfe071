//! SVG Optimizer Service
//!
//! Ingests untrusted SVG documents, strips executable content, optimizes the
//! markup through a pluggable engine, and serves the results with shared
//! caching and per-credential rate limiting.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                  SVG OPTIMIZER                   │
//!                     │                                                  │
//!   Client Request    │  ┌──────────┐   ┌───────────┐   ┌────────────┐  │
//!   ──────────────────┼─▶│ security │──▶│ pipeline  │──▶│   cache    │  │
//!                     │  │rate limit│   │ validate/ │   │ (LRU, hit/ │  │
//!                     │  └──────────┘   │ sanitize  │   │  miss)     │  │
//!                     │                 └─────┬─────┘   └─────┬──────┘  │
//!                     │                       ▼               │         │
//!                     │                 ┌───────────┐         │         │
//!                     │                 │  engine   │         │         │
//!                     │                 │ (reduce)  │         │         │
//!                     │                 └─────┬─────┘         │         │
//!   Client Response   │  ┌──────────┐   ┌─────▼─────┐         │         │
//!   ◀─────────────────┼──│ response │◀──│ transform │◀────────┘         │
//!                     │  │  shapes  │   │ camelCase │                   │
//!                     │  └──────────┘   └───────────┘                   │
//!                     │                                                  │
//!                     │  ┌────────────────────────────────────────────┐ │
//!                     │  │           Cross-Cutting Concerns           │ │
//!                     │  │  config · observability · lifecycle ·     │ │
//!                     │  │  history (fire-and-forget) · admin        │ │
//!                     │  └────────────────────────────────────────────┘ │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use svg_optimizer::config::{loader::load_config, OptimizerConfig};
use svg_optimizer::http::HttpServer;
use svg_optimizer::lifecycle::{signals, Shutdown};
use svg_optimizer::observability::{logging, metrics};
use svg_optimizer::pipeline::default_engine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration: first CLI argument is the config path, defaults
    // otherwise.
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => OptimizerConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_file_bytes = config.pipeline.max_file_bytes,
        cache_entries = config.cache.max_entries,
        rate_limit = config.rate_limit.default_limit,
        "Configuration loaded"
    );

    // Metrics exporter on its own address.
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Bind TCP listener.
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    // Shutdown on SIGINT/SIGTERM.
    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_handler(shutdown.clone());

    // Create and run the HTTP server against the lazily-built default engine.
    let server = HttpServer::new(config, default_engine());
    server.run(listener, shutdown.subscribe()).await?;

    Ok(())
}
