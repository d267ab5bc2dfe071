//! Per-credential rate limiting middleware.
//!
//! # Responsibilities
//! - Admit or reject requests against fixed per-credential windows
//! - Report limit/remaining/reset on every response, Retry-After on 429
//!
//! # Design Decisions
//! - Fixed non-overlapping windows: a window is replaced, never stretched,
//!   once its span has elapsed
//! - Every request increments the window count, rejected ones included
//! - Credential is the X-Api-Key header, falling back to the client IP
//! - Expired windows are purged opportunistically; correctness never
//!   depends on purging

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde::Serialize;

use crate::config::schema::RateLimitConfig;
use crate::error::PipelineError;
use crate::observability::metrics;

/// Header carrying the caller's credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// One live window for one credential.
#[derive(Debug, Clone)]
struct Window {
    count: u32,
    window_start: Instant,
    limit: u32,
}

/// A rejected request, with back-off guidance.
#[derive(Debug, Clone, Copy)]
pub struct RateLimited {
    /// Whole seconds until the current window resets (ceiling, ≤ window).
    pub retry_after_secs: u64,
    pub limit: u32,
}

impl From<RateLimited> for PipelineError {
    fn from(r: RateLimited) -> Self {
        PipelineError::RateLimitExceeded {
            retry_after_secs: r.retry_after_secs,
            limit: r.limit,
        }
    }
}

/// An admitted request, with the header values to report.
#[derive(Debug, Clone, Copy)]
pub struct Admitted {
    pub limit: u32,
    pub remaining: u32,
    /// Whole seconds until the current window resets.
    pub reset_secs: u64,
}

/// Thread-safe fixed-window rate limiter.
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    window: Duration,
    default_limit: u32,
    overrides: HashMap<String, u32>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let overrides = config
            .overrides
            .iter()
            .map(|o| (o.credential.clone(), o.limit))
            .collect();
        Self {
            windows: DashMap::new(),
            window: Duration::from_secs(config.window_secs),
            default_limit: config.default_limit,
            overrides,
        }
    }

    fn limit_for(&self, credential: &str) -> u32 {
        self.overrides
            .get(credential)
            .copied()
            .unwrap_or(self.default_limit)
    }

    /// Admit or reject a request for the given credential.
    pub fn admit(&self, credential: &str) -> Result<Admitted, RateLimited> {
        self.admit_at(credential, Instant::now())
    }

    /// Deterministic entry point used by `admit` and by tests.
    fn admit_at(&self, credential: &str, now: Instant) -> Result<Admitted, RateLimited> {
        let limit = self.limit_for(credential);
        let mut entry = self
            .windows
            .entry(credential.to_string())
            .or_insert_with(|| Window {
                count: 0,
                window_start: now,
                limit,
            });
        let window = entry.value_mut();

        // Expired: open a fresh window instead of stretching the old one.
        if now.duration_since(window.window_start) >= self.window {
            *window = Window {
                count: 0,
                window_start: now,
                limit,
            };
        }

        // Counted for bookkeeping whether admitted or rejected.
        window.count += 1;

        let elapsed = now.duration_since(window.window_start);
        let remaining_time = self.window.saturating_sub(elapsed);
        let reset_secs = ceil_secs(remaining_time);

        if window.count > window.limit {
            metrics::record_rate_limited();
            tracing::warn!(
                credential = %credential,
                count = window.count,
                limit = window.limit,
                "Rate limit exceeded"
            );
            Err(RateLimited {
                retry_after_secs: reset_secs,
                limit: window.limit,
            })
        } else {
            Ok(Admitted {
                limit: window.limit,
                remaining: window.limit - window.count,
                reset_secs,
            })
        }
    }

    /// Drop windows whose span has already elapsed. Bounds memory; not
    /// required for correctness.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        let before = self.windows.len();
        self.windows
            .retain(|_, window| now.duration_since(window.window_start) < self.window);
        let purged = before - self.windows.len();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired rate limit windows");
        }
    }

    /// Number of live (possibly expired, not yet purged) windows.
    pub fn tracked_credentials(&self) -> usize {
        self.windows.len()
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

/// 429 body shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitBody {
    success: bool,
    error: String,
    retry_after: u64,
}

fn header_value(n: u64) -> HeaderValue {
    HeaderValue::from_str(&n.to_string()).expect("numeric header value")
}

/// Middleware admitting requests against the shared limiter.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let credential = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| addr.ip().to_string());

    match limiter.admit(&credential) {
        Ok(admitted) => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", header_value(admitted.limit.into()));
            headers.insert("x-ratelimit-remaining", header_value(admitted.remaining.into()));
            headers.insert("x-ratelimit-reset", header_value(admitted.reset_secs));
            response
        }
        Err(limited) => {
            let error = PipelineError::from(limited).to_string();
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(RateLimitBody {
                    success: false,
                    error,
                    retry_after: limited.retry_after_secs,
                }),
            )
                .into_response();
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", header_value(limited.limit.into()));
            headers.insert("x-ratelimit-remaining", header_value(0));
            headers.insert("x-ratelimit-reset", header_value(limited.retry_after_secs));
            headers.insert("retry-after", header_value(limited.retry_after_secs));
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::CredentialLimit;

    fn limiter(default_limit: u32) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            enabled: true,
            window_secs: 60,
            default_limit,
            overrides: vec![CredentialLimit {
                credential: "premium".into(),
                limit: 100,
            }],
        })
    }

    #[test]
    fn test_limit_allows_then_rejects() {
        let limiter = limiter(5);
        let now = Instant::now();

        for i in 0..5 {
            let admitted = limiter.admit_at("key-a", now).unwrap();
            assert_eq!(admitted.remaining, 4 - i);
        }

        let limited = limiter.admit_at("key-a", now).unwrap_err();
        assert!(limited.retry_after_secs <= 60);
        assert_eq!(limited.limit, 5);
    }

    #[test]
    fn test_fresh_window_after_expiry() {
        let limiter = limiter(2);
        let start = Instant::now();

        limiter.admit_at("key-a", start).unwrap();
        limiter.admit_at("key-a", start).unwrap();
        limiter.admit_at("key-a", start).unwrap_err();

        // Past the window: the counter starts over at 1.
        let later = start + Duration::from_secs(61);
        let admitted = limiter.admit_at("key-a", later).unwrap();
        assert_eq!(admitted.remaining, 1);
    }

    #[test]
    fn test_rejections_still_count() {
        let limiter = limiter(1);
        let start = Instant::now();

        limiter.admit_at("key-a", start).unwrap();
        limiter.admit_at("key-a", start).unwrap_err();
        limiter.admit_at("key-a", start).unwrap_err();

        // A later request in the same window still sees the window live.
        let near_end = start + Duration::from_secs(59);
        let limited = limiter.admit_at("key-a", near_end).unwrap_err();
        assert!(limited.retry_after_secs <= 1);
    }

    #[test]
    fn test_credentials_are_independent() {
        let limiter = limiter(1);
        let now = Instant::now();

        limiter.admit_at("key-a", now).unwrap();
        limiter.admit_at("key-a", now).unwrap_err();
        limiter.admit_at("key-b", now).unwrap();
    }

    #[test]
    fn test_override_limit_applies() {
        let limiter = limiter(1);
        let now = Instant::now();

        let admitted = limiter.admit_at("premium", now).unwrap();
        assert_eq!(admitted.limit, 100);
        assert_eq!(admitted.remaining, 99);
    }

    #[test]
    fn test_retry_after_is_ceiling() {
        let limiter = limiter(1);
        let start = Instant::now();

        limiter.admit_at("key-a", start).unwrap();
        let limited = limiter
            .admit_at("key-a", start + Duration::from_millis(59_500))
            .unwrap_err();
        // 500ms remain; the caller is told a full second.
        assert_eq!(limited.retry_after_secs, 1);
    }

    #[test]
    fn test_purge_drops_only_expired() {
        let limiter = limiter(5);
        let now = Instant::now();
        limiter.admit_at("live", now).unwrap();

        limiter.purge_expired();
        assert_eq!(limiter.tracked_credentials(), 1);
    }
}
