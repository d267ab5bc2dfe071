//! Read-only risk scan for callers that skip sanitization.
//!
//! # Responsibilities
//! - Report the same construct categories the sanitizer removes, without
//!   mutating the document
//! - One warning per dangerous element present, per distinct event handler
//!   attribute name, and per dangerous URL scheme
//!
//! # Design Decisions
//! - Warnings are ordered: elements, handler names, schemes — each in
//!   first-detection order
//! - Handler names and schemes are deduplicated case-insensitively

use crate::sanitize::patterns::{DANGEROUS_URLS, ELEMENT_PROBES, EVENT_HANDLERS};

/// Scan a document and report risk warnings without modifying it.
pub fn audit(doc: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    for (tag, probe) in ELEMENT_PROBES.iter() {
        if probe.is_match(doc) {
            warnings.push(format!("contains <{tag}> element"));
        }
    }

    let mut seen_handlers: Vec<String> = Vec::new();
    for caps in EVENT_HANDLERS.captures_iter(doc) {
        let name = caps[1].to_ascii_lowercase();
        if !seen_handlers.contains(&name) {
            warnings.push(format!("contains event handler attribute '{name}'"));
            seen_handlers.push(name);
        }
    }

    let mut seen_schemes: Vec<String> = Vec::new();
    for caps in DANGEROUS_URLS.captures_iter(doc) {
        let scheme = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();
        if !scheme.is_empty() && !seen_schemes.contains(&scheme) {
            warnings.push(format!("contains dangerous URL scheme '{scheme}'"));
            seen_schemes.push(scheme);
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_document_no_warnings() {
        assert!(audit(r#"<svg><rect fill-opacity="0.5"/></svg>"#).is_empty());
    }

    #[test]
    fn test_one_warning_per_distinct_handler_name() {
        let doc = concat!(
            r#"<svg onclick="a()" onload="b()">"#,
            r#"<rect onclick="c()"/>"#,
            r#"<circle onpointerdown='d()'/>"#,
            "</svg>"
        );
        let warnings = audit(doc);
        let handler_warnings: Vec<_> = warnings
            .iter()
            .filter(|w| w.contains("event handler"))
            .collect();
        assert_eq!(handler_warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.contains("'onclick'")));
        assert!(warnings.iter().any(|w| w.contains("'onload'")));
        assert!(warnings.iter().any(|w| w.contains("'onpointerdown'")));
    }

    #[test]
    fn test_element_warnings_by_tag() {
        let doc = r#"<svg><script>x()</script><iframe src="y"/><iframe src="z"/></svg>"#;
        let warnings = audit(doc);
        assert_eq!(
            warnings,
            vec![
                "contains <script> element".to_string(),
                "contains <iframe> element".to_string(),
            ]
        );
    }

    #[test]
    fn test_one_warning_per_scheme() {
        let doc = concat!(
            r#"<svg><a href="javascript:a()">x</a>"#,
            r#"<a href="javascript:b()">y</a>"#,
            r#"<image src='data:text/html,<b>'/></svg>"#
        );
        let warnings = audit(doc);
        let scheme_warnings: Vec<_> = warnings
            .iter()
            .filter(|w| w.contains("URL scheme"))
            .collect();
        assert_eq!(scheme_warnings.len(), 2);
    }

    #[test]
    fn test_audit_does_not_modify() {
        // Pure read: the input is borrowed, never rewritten. This pins the
        // contract that callers can audit and still submit the original.
        let doc = r#"<svg onclick="x()"/>"#;
        let _ = audit(doc);
        assert_eq!(doc, r#"<svg onclick="x()"/>"#);
    }
}
