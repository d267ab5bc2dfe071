use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::atomic::Ordering;

use crate::cache::CacheStats;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct AnalyticsSummary {
    pub total_requests: usize,
    pub tracked_credentials: usize,
    pub cache: CacheStats,
}

pub async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        service: "svg-optimizer",
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

/// Aggregate cache counters. The cache itself is never exposed as a
/// key/value interface.
pub async fn get_cache(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

pub async fn get_analytics(State(state): State<AppState>) -> Json<AnalyticsSummary> {
    Json(AnalyticsSummary {
        total_requests: state.request_count.load(Ordering::Relaxed),
        tracked_credentials: state.limiter.tracked_credentials(),
        cache: state.cache.stats(),
    })
}
