//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (rate limiting, body limit, timeout, request ID,
//!   tracing)
//! - Bind to a listener and serve until shutdown
//!
//! # Design Decisions
//! - Rate limiting wraps only the API routes; health and admin stay
//!   reachable for probes and dashboards
//! - Body limit sits above the pipeline's own size check so oversized
//!   uploads still produce a structured error

use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::cache::OptimizationCache;
use crate::config::OptimizerConfig;
use crate::http::handlers;
use crate::http::request::RequestIdLayer;
use crate::pipeline::{HistoryLog, OptimizeService, Reducer, TracingSink};
use crate::security::rate_limit::{rate_limit_middleware, RateLimiter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OptimizeService>,
    pub cache: Arc<OptimizationCache>,
    pub limiter: Arc<RateLimiter>,
    pub config: Arc<OptimizerConfig>,
    pub request_count: Arc<AtomicUsize>,
}

/// HTTP server for the SVG optimizer.
pub struct HttpServer {
    router: Router,
    config: OptimizerConfig,
    limiter: Arc<RateLimiter>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and engine.
    /// Must be called from within a Tokio runtime (the history drain task is
    /// spawned here).
    pub fn new(config: OptimizerConfig, engine: Arc<dyn Reducer>) -> Self {
        // Initialize subsystems
        let cache = Arc::new(OptimizationCache::new(config.cache.max_entries));
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        let history = HistoryLog::spawn(Arc::new(TracingSink));
        let service = Arc::new(OptimizeService::new(
            config.pipeline.clone(),
            engine,
            cache.clone(),
            history,
        ));

        let state = AppState {
            service,
            cache,
            limiter: limiter.clone(),
            config: Arc::new(config.clone()),
            request_count: Arc::new(AtomicUsize::new(0)),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            limiter,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &OptimizerConfig, state: AppState) -> Router {
        let mut api = Router::new().route("/api/optimize", post(handlers::optimize));
        if config.rate_limit.enabled {
            api = api.route_layer(middleware::from_fn_with_state(
                state.limiter.clone(),
                rate_limit_middleware,
            ));
        }

        let mut app = Router::new()
            .merge(api.with_state(state.clone()))
            .route("/health", get(handlers::health));

        if config.admin.enabled {
            app = app.merge(crate::admin::setup_admin_router(state));
        }

        app.layer(TimeoutLayer::new(Duration::from_secs(
            config.listener.request_timeout_secs,
        )))
        .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
        .layer(RequestIdLayer)
        .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections until the shutdown signal.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        // Opportunistic rate-limit window purge, once per window.
        let limiter = self.limiter.clone();
        let purge_period = Duration::from_secs(self.config.rate_limit.window_secs.max(1));
        let mut purge_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(purge_period);
            loop {
                tokio::select! {
                    _ = interval.tick() => limiter.purge_expired(),
                    _ = purge_shutdown.recv() => break,
                }
            }
        });

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }
}
