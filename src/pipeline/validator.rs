//! Input validation ahead of any scanning or optimization.
//!
//! # Responsibilities
//! - Enforce the byte-size ceiling before later steps spend work
//! - Reject content that is not an SVG document
//!
//! # Design Decisions
//! - Size is measured in encoded bytes (`str::len`), not characters
//! - Checked before sanitization so scanning cost is bounded
//! - Fixed user-facing messages; these errors are never retried

use crate::error::PipelineError;

/// Default document size ceiling: 1 MiB.
pub const DEFAULT_MAX_BYTES: usize = 1_048_576;

/// Reject content larger than `max_bytes` encoded bytes.
pub fn validate_size(content: &str, max_bytes: usize) -> Result<(), PipelineError> {
    if content.len() > max_bytes {
        return Err(PipelineError::PayloadTooLarge {
            size: content.len(),
            limit: max_bytes,
        });
    }
    Ok(())
}

/// Reject content that does not begin (after trimming whitespace) with an
/// SVG root tag or an XML prolog. Empty content fails here too.
pub fn validate_markup(content: &str) -> Result<(), PipelineError> {
    let trimmed = content.trim();
    if trimmed.starts_with("<svg") || trimmed.starts_with("<?xml") {
        Ok(())
    } else {
        Err(PipelineError::InvalidMarkup)
    }
}

/// Render a byte count in human-readable units with one decimal.
pub fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    const GB: f64 = 1024.0 * 1024.0 * 1024.0;

    let bytes_f = bytes as f64;
    if bytes_f >= GB {
        format!("{:.1} GB", bytes_f / GB)
    } else if bytes_f >= MB {
        format!("{:.1} MB", bytes_f / MB)
    } else if bytes_f >= KB {
        format!("{:.1} KB", bytes_f / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_limit_passes() {
        let content = "x".repeat(DEFAULT_MAX_BYTES);
        assert!(validate_size(&content, DEFAULT_MAX_BYTES).is_ok());
    }

    #[test]
    fn test_one_byte_over_fails_with_both_sizes() {
        let content = "x".repeat(DEFAULT_MAX_BYTES + 1);
        let err = validate_size(&content, DEFAULT_MAX_BYTES).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("1.0 MB"), "message: {msg}");
    }

    #[test]
    fn test_multibyte_counted_by_encoded_length() {
        // '€' is three bytes in UTF-8; four characters but twelve bytes.
        let content = "€€€€";
        assert_eq!(content.chars().count(), 4);
        assert!(validate_size(content, 11).is_err());
        assert!(validate_size(content, 12).is_ok());
    }

    #[test]
    fn test_markup_accepts_svg_and_prolog() {
        assert!(validate_markup("<svg xmlns=\"a\"/>").is_ok());
        assert!(validate_markup("  \n\t<?xml version=\"1.0\"?><svg/>").is_ok());
    }

    #[test]
    fn test_markup_rejects_other_content() {
        assert!(validate_markup("").is_err());
        assert!(validate_markup("   \n ").is_err());
        assert!(validate_markup("<html><body/></html>").is_err());
        assert!(validate_markup("plain text").is_err());
    }

    #[test]
    fn test_format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(1_048_576), "1.0 MB");
        assert_eq!(format_bytes(1_572_864), "1.5 MB");
    }
}
