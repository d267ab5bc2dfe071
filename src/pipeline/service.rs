//! Pipeline orchestration.
//!
//! # Responsibilities
//! - Drive one request through validation, cache, sanitization/audit, the
//!   optimization engine, and case conversion
//! - Account every request to the history log, success or failure
//!
//! # Design Decisions
//! - Cache hits skip the sanitizer and the engine entirely, but still reach
//!   the history log
//! - Engine failures propagate immediately; the pipeline defines no retry
//! - Two concurrent misses for one key may both compute and both write the
//!   cache; the written values are identical, so last write wins

use std::sync::Arc;

use crate::cache::{CacheEntry, CacheKey, OptimizationCache};
use crate::config::schema::PipelineConfig;
use crate::error::PipelineError;
use crate::observability::metrics;
use crate::pipeline::engine::Reducer;
use crate::pipeline::history::{HistoryLog, RequestRecord};
use crate::pipeline::validator;
use crate::sanitize::{audit, sanitize, SanitizeOptions};
use crate::transform::to_camel_case;

/// One optimization request, entry-point agnostic.
#[derive(Debug, Clone)]
pub struct OptimizeJob {
    pub content: String,
    pub filename: Option<String>,
    /// Overrides `PipelineConfig::camel_case_default` when set.
    pub camel_case: Option<bool>,
    /// Overrides `PipelineConfig::sanitize_default` when set.
    pub sanitize: Option<bool>,
    /// Overrides `PipelineConfig::max_file_bytes` when set.
    pub max_bytes: Option<usize>,
    /// Credential for history accounting, when one was presented.
    pub credential: Option<String>,
}

/// The computed result handed back to the serving layer.
#[derive(Debug, Clone)]
pub struct OptimizeSummary {
    pub filename: String,
    pub original_size: usize,
    pub optimized_size: usize,
    pub camel_case_applied: bool,
    pub sanitized: bool,
    pub warnings: Vec<String>,
    pub result: String,
    pub cached: bool,
}

impl OptimizeSummary {
    /// Bytes saved by optimization; negative when the engine grew the
    /// document.
    pub fn saved_bytes(&self) -> i64 {
        self.original_size as i64 - self.optimized_size as i64
    }

    /// Saved share of the original, e.g. "12.3%".
    pub fn saved_percent(&self) -> String {
        let percent = self.saved_bytes() as f64 * 100.0 / self.original_size as f64;
        format!("{percent:.1}%")
    }

    /// Optimized/original size ratio, e.g. "0.877".
    pub fn ratio(&self) -> String {
        format!(
            "{:.3}",
            self.optimized_size as f64 / self.original_size as f64
        )
    }
}

/// The ingestion and optimization pipeline.
pub struct OptimizeService {
    config: PipelineConfig,
    engine: Arc<dyn Reducer>,
    cache: Arc<OptimizationCache>,
    history: HistoryLog,
}

impl OptimizeService {
    pub fn new(
        config: PipelineConfig,
        engine: Arc<dyn Reducer>,
        cache: Arc<OptimizationCache>,
        history: HistoryLog,
    ) -> Self {
        Self {
            config,
            engine,
            cache,
            history,
        }
    }

    /// Run one job through the pipeline.
    pub async fn optimize(&self, job: OptimizeJob) -> Result<OptimizeSummary, PipelineError> {
        let filename = job
            .filename
            .clone()
            .unwrap_or_else(|| "untitled.svg".to_string());
        let camel_case = job.camel_case.unwrap_or(self.config.camel_case_default);
        let sanitize_requested = job.sanitize.unwrap_or(self.config.sanitize_default);
        let max_bytes = job.max_bytes.unwrap_or(self.config.max_file_bytes);

        // 1. Validate shape and size before spending any scanning work.
        validator::validate_markup(&job.content)?;
        validator::validate_size(&job.content, max_bytes)?;

        // 2. Cache lookup by content and result-affecting options.
        let key = CacheKey::for_request(&job.content, camel_case, sanitize_requested);
        if let Some(entry) = self.cache.get(&key) {
            tracing::debug!(key = %key, filename = %filename, "Cache hit");
            let summary = OptimizeSummary {
                filename,
                original_size: entry.original_size,
                optimized_size: entry.optimized_size,
                camel_case_applied: camel_case,
                sanitized: sanitize_requested,
                warnings: entry.warnings,
                result: entry.result,
                cached: true,
            };
            self.record(&job, &summary, None);
            return Ok(summary);
        }

        // 3. Sanitize, or audit for callers that opted out of mutation.
        let (document, warnings) = if sanitize_requested {
            let outcome = sanitize(&job.content, &SanitizeOptions::default());
            metrics::record_sanitizer_removals(outcome.issues.len());
            if outcome.modified {
                tracing::info!(
                    filename = %filename,
                    categories = outcome.issues.len(),
                    "Sanitizer removed dangerous content"
                );
            }
            (outcome.sanitized, outcome.issues)
        } else {
            (job.content.clone(), audit(&job.content))
        };

        // 4. External reduction; failures surface as-is, never retried.
        let reduced = match self.engine.reduce(&document) {
            Ok(reduced) => reduced,
            Err(e) => {
                tracing::error!(
                    engine = self.engine.name(),
                    filename = %filename,
                    error = %e,
                    "Optimization engine failed"
                );
                let err = PipelineError::Optimization(e.to_string());
                self.record_failure(&job, &filename, &err);
                return Err(err);
            }
        };

        // 5. Output attribute convention.
        let result = if camel_case {
            to_camel_case(&reduced)
        } else {
            reduced
        };

        // 6. Store and account.
        let entry = CacheEntry::new(result.clone(), job.content.len(), warnings.clone());
        self.cache.insert(key, entry);

        let summary = OptimizeSummary {
            filename,
            original_size: job.content.len(),
            optimized_size: result.len(),
            camel_case_applied: camel_case,
            sanitized: sanitize_requested,
            warnings,
            result,
            cached: false,
        };
        self.record(&job, &summary, None);
        Ok(summary)
    }

    fn record(&self, job: &OptimizeJob, summary: &OptimizeSummary, error: Option<String>) {
        self.history.submit(RequestRecord {
            credential: job.credential.clone(),
            filename: summary.filename.clone(),
            original_size: summary.original_size,
            optimized_size: summary.optimized_size,
            success: error.is_none(),
            cached: summary.cached,
            error,
        });
    }

    fn record_failure(&self, job: &OptimizeJob, filename: &str, error: &PipelineError) {
        self.history.submit(RequestRecord {
            credential: job.credential.clone(),
            filename: filename.to_string(),
            original_size: job.content.len(),
            optimized_size: 0,
            success: false,
            cached: false,
            error: Some(error.to_string()),
        });
    }
}
