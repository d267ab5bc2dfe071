//! API response shapes and error mapping.
//!
//! # Responsibilities
//! - Define the success/error JSON shapes of the optimize endpoint
//! - Map pipeline errors to HTTP status codes
//!
//! # Design Decisions
//! - JSON keys are camelCase, matching every non-Rust consumer of the API
//! - `securityWarnings` is omitted entirely when empty
//! - Rate limiting answers at the middleware layer; its mapping here covers
//!   programmatic callers that surface the pipeline error directly

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::pipeline::OptimizeSummary;

/// Success response of `POST /api/optimize`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub success: bool,
    pub filename: String,
    pub optimization: OptimizationStats,
    pub camel_case_applied: bool,
    pub sanitized: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_warnings: Vec<String>,
    pub result: String,
}

/// Size accounting block of a success response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationStats {
    pub original_size: usize,
    pub optimized_size: usize,
    pub saved_bytes: i64,
    pub saved_percent: String,
    pub ratio: String,
}

impl From<OptimizeSummary> for OptimizeResponse {
    fn from(summary: OptimizeSummary) -> Self {
        let optimization = OptimizationStats {
            original_size: summary.original_size,
            optimized_size: summary.optimized_size,
            saved_bytes: summary.saved_bytes(),
            saved_percent: summary.saved_percent(),
            ratio: summary.ratio(),
        };
        Self {
            success: true,
            filename: summary.filename,
            optimization,
            camel_case_applied: summary.camel_case_applied,
            sanitized: summary.sanitized,
            security_warnings: summary.warnings,
            result: summary.result,
        }
    }
}

/// Error response shape shared by every failure path.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = match &self {
            PipelineError::InvalidMarkup => StatusCode::BAD_REQUEST,
            PipelineError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            PipelineError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            PipelineError::Optimization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut response =
            (status, Json(ErrorResponse::new(self.to_string()))).into_response();

        if let PipelineError::RateLimitExceeded {
            retry_after_secs, ..
        } = self
        {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert("retry-after", value);
            }
        }

        response
    }
}
