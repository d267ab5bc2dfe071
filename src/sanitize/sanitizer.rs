//! Destructive removal of dangerous constructs from untrusted SVG documents.
//!
//! # Responsibilities
//! - Remove script elements, dangerous elements, event handler attributes,
//!   and dangerous URL references according to the caller's options
//! - Report one issue string per category that removed anything
//!
//! # Design Decisions
//! - Categories are independently toggleable; all default to enabled
//! - A clean document is returned byte-identical to the input with
//!   `modified == false` — callers rely on this invariant
//! - Issues record categories, not individual matches

use std::borrow::Cow;

use regex::Regex;

use crate::sanitize::patterns::{
    DANGEROUS_ELEMENTS, DANGEROUS_URLS, EVENT_HANDLERS, SCRIPT_ELEMENTS,
};

/// Toggles for the four removal categories.
#[derive(Debug, Clone, Copy)]
pub struct SanitizeOptions {
    /// Remove `<script>` elements, content included.
    pub remove_scripts: bool,
    /// Remove event handler (`on*`) attributes.
    pub remove_event_handlers: bool,
    /// Remove non-script elements capable of loading executable content.
    pub remove_dangerous_elements: bool,
    /// Remove attributes whose value carries a dangerous URI scheme.
    pub remove_dangerous_urls: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            remove_scripts: true,
            remove_event_handlers: true,
            remove_dangerous_elements: true,
            remove_dangerous_urls: true,
        }
    }
}

/// Result of a sanitization pass.
#[derive(Debug, Clone)]
pub struct SanitizeOutcome {
    /// The cleaned document; identical to the input when `modified` is false.
    pub sanitized: String,
    /// Whether any removal took place.
    pub modified: bool,
    /// One human-readable entry per category that removed something, in scan
    /// order.
    pub issues: Vec<String>,
}

/// Run one removal pattern; `Some(new)` only when the pattern matched.
fn strip(re: &Regex, input: &str) -> Option<String> {
    match re.replace_all(input, "") {
        Cow::Borrowed(_) => None,
        Cow::Owned(cleaned) => Some(cleaned),
    }
}

/// Sanitize a document according to the given options.
///
/// Scan order: scripts, dangerous elements, event handlers, dangerous URLs.
pub fn sanitize(doc: &str, options: &SanitizeOptions) -> SanitizeOutcome {
    let mut current: Cow<'_, str> = Cow::Borrowed(doc);
    let mut issues = Vec::new();

    if options.remove_scripts {
        if let Some(cleaned) = strip(&SCRIPT_ELEMENTS, &current) {
            current = Cow::Owned(cleaned);
            issues.push("removed script elements".to_string());
        }
    }

    if options.remove_dangerous_elements {
        if let Some(cleaned) = strip(&DANGEROUS_ELEMENTS, &current) {
            current = Cow::Owned(cleaned);
            issues.push("removed dangerous elements".to_string());
        }
    }

    if options.remove_event_handlers {
        if let Some(cleaned) = strip(&EVENT_HANDLERS, &current) {
            current = Cow::Owned(cleaned);
            issues.push("removed event handler attributes".to_string());
        }
    }

    if options.remove_dangerous_urls {
        if let Some(cleaned) = strip(&DANGEROUS_URLS, &current) {
            current = Cow::Owned(cleaned);
            issues.push("removed dangerous URL references".to_string());
        }
    }

    SanitizeOutcome {
        modified: !issues.is_empty(),
        sanitized: current.into_owned(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize_default(doc: &str) -> SanitizeOutcome {
        sanitize(doc, &SanitizeOptions::default())
    }

    #[test]
    fn test_clean_document_is_untouched() {
        let doc = r#"<svg viewBox="0 0 10 10"><rect fill-opacity="0.5"/></svg>"#;
        let outcome = sanitize_default(doc);
        assert!(!outcome.modified);
        assert!(outcome.issues.is_empty());
        assert_eq!(outcome.sanitized, doc);
    }

    #[test]
    fn test_script_removal_single_issue_for_many_scripts() {
        let doc = r#"<svg><script>a()</script><rect/><script href="x"/><script>b()</script></svg>"#;
        let outcome = sanitize_default(doc);
        assert!(outcome.modified);
        assert!(!outcome.sanitized.contains("<script"));
        assert_eq!(
            outcome.issues,
            vec!["removed script elements".to_string()]
        );
    }

    #[test]
    fn test_event_handler_removed_element_kept() {
        let doc = r#"<svg onload="boom()" viewBox="0 0 1 1"><circle onclick='hit()' r="1"/></svg>"#;
        let outcome = sanitize_default(doc);
        assert!(!outcome.sanitized.contains("onload"));
        assert!(!outcome.sanitized.contains("onclick"));
        assert!(outcome.sanitized.contains(r#"viewBox="0 0 1 1""#));
        assert!(outcome.sanitized.contains(r#"r="1""#));
    }

    #[test]
    fn test_dangerous_url_attribute_removed_whole() {
        let doc = r#"<svg><a href="javascript:alert(1)" id="x">link</a></svg>"#;
        let outcome = sanitize_default(doc);
        assert!(!outcome.sanitized.contains("javascript:"));
        assert!(!outcome.sanitized.contains("href"));
        assert!(outcome.sanitized.contains(r#"id="x""#));
    }

    #[test]
    fn test_categories_toggle_independently() {
        let doc = r#"<svg onclick="x()"><script>y()</script></svg>"#;
        let options = SanitizeOptions {
            remove_event_handlers: false,
            ..SanitizeOptions::default()
        };
        let outcome = sanitize(doc, &options);
        assert!(outcome.sanitized.contains("onclick"));
        assert!(!outcome.sanitized.contains("<script"));
        assert_eq!(outcome.issues.len(), 1);
    }

    #[test]
    fn test_all_disabled_never_modifies() {
        let doc = r#"<svg onclick="x()"><script>y()</script></svg>"#;
        let options = SanitizeOptions {
            remove_scripts: false,
            remove_event_handlers: false,
            remove_dangerous_elements: false,
            remove_dangerous_urls: false,
        };
        let outcome = sanitize(doc, &options);
        assert!(!outcome.modified);
        assert_eq!(outcome.sanitized, doc);
    }

    #[test]
    fn test_modified_tracks_issues() {
        let dirty = sanitize_default(r#"<svg><iframe src="x"/></svg>"#);
        assert_eq!(dirty.modified, !dirty.issues.is_empty());
        assert_eq!(dirty.issues, vec!["removed dangerous elements".to_string()]);

        let clean = sanitize_default("<svg/>");
        assert_eq!(clean.modified, !clean.issues.is_empty());
    }

    #[test]
    fn test_issue_order_follows_scan_order() {
        let doc = concat!(
            r#"<svg onclick="h()">"#,
            r#"<a href="vbscript:x">l</a>"#,
            r#"<iframe src="y"/>"#,
            r#"<script>z()</script>"#,
            "</svg>"
        );
        let outcome = sanitize_default(doc);
        assert_eq!(
            outcome.issues,
            vec![
                "removed script elements".to_string(),
                "removed dangerous elements".to_string(),
                "removed event handler attributes".to_string(),
                "removed dangerous URL references".to_string(),
            ]
        );
    }
}
