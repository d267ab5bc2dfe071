//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, addresses parseable)
//! - Detect duplicate credential overrides
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: OptimizerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::OptimizerConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate an already-parsed configuration.
pub fn validate_config(config: &OptimizerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(err(
            "listener.bind_address",
            format!("not a valid socket address: {}", config.listener.bind_address),
        ));
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(err("listener.request_timeout_secs", "must be greater than 0"));
    }

    if config.pipeline.max_file_bytes == 0 {
        errors.push(err("pipeline.max_file_bytes", "must be greater than 0"));
    }

    if config.listener.max_body_bytes < config.pipeline.max_file_bytes {
        errors.push(err(
            "listener.max_body_bytes",
            "must be at least pipeline.max_file_bytes so the validator sees oversized documents",
        ));
    }

    if config.cache.max_entries == 0 {
        errors.push(err("cache.max_entries", "must be greater than 0"));
    }

    if config.rate_limit.window_secs == 0 {
        errors.push(err("rate_limit.window_secs", "must be greater than 0"));
    }

    if config.rate_limit.default_limit == 0 {
        errors.push(err("rate_limit.default_limit", "must be greater than 0"));
    }

    let mut seen = HashSet::new();
    for over in &config.rate_limit.overrides {
        if over.credential.is_empty() {
            errors.push(err("rate_limit.overrides", "credential must not be empty"));
        }
        if over.limit == 0 {
            errors.push(err(
                "rate_limit.overrides",
                format!("limit for '{}' must be greater than 0", over.credential),
            ));
        }
        if !seen.insert(over.credential.clone()) {
            errors.push(err(
                "rate_limit.overrides",
                format!("duplicate override for credential '{}'", over.credential),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(err(
            "observability.metrics_address",
            format!("not a valid socket address: {}", config.observability.metrics_address),
        ));
    }

    if config.admin.enabled && config.admin.api_key.is_empty() {
        errors.push(err("admin.api_key", "must not be empty when admin is enabled"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::CredentialLimit;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&OptimizerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = OptimizerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.cache.max_entries = 0;
        config.rate_limit.default_limit = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_duplicate_override_rejected() {
        let mut config = OptimizerConfig::default();
        config.rate_limit.overrides = vec![
            CredentialLimit { credential: "key-a".into(), limit: 10 },
            CredentialLimit { credential: "key-a".into(), limit: 20 },
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("duplicate"));
    }

    #[test]
    fn test_body_limit_must_cover_file_limit() {
        let mut config = OptimizerConfig::default();
        config.listener.max_body_bytes = 1024;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "listener.max_body_bytes");
    }
}
