//! HTTP handlers for the optimize API.
//!
//! This service accepts untrusted SVG documents, runs them through the
//! sanitize/optimize pipeline, and returns the optimized markup with size
//! accounting.

use std::sync::atomic::Ordering;
use std::time::Instant;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::response::OptimizeResponse;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::pipeline::OptimizeJob;
use crate::security::rate_limit::API_KEY_HEADER;

/// Request body of `POST /api/optimize`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub content: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub camel_case: Option<bool>,
    #[serde(default)]
    pub sanitize: Option<bool>,
    #[serde(default)]
    pub max_size: Option<usize>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "svg-optimizer",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Optimize one SVG document.
pub async fn optimize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<OptimizeRequest>,
) -> Response {
    let start = Instant::now();
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let credential = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let job = OptimizeJob {
        content: request.content,
        filename: request.filename,
        camel_case: request.camel_case,
        sanitize: request.sanitize,
        max_bytes: request.max_size,
        credential,
    };

    match state.service.optimize(job).await {
        Ok(summary) => {
            tracing::debug!(
                filename = %summary.filename,
                original_size = summary.original_size,
                optimized_size = summary.optimized_size,
                cached = summary.cached,
                "Request optimized"
            );
            metrics::record_request(200, start);
            Json(OptimizeResponse::from(summary)).into_response()
        }
        Err(err) => {
            let response = err.into_response();
            metrics::record_request(response.status().as_u16(), start);
            response
        }
    }
}
