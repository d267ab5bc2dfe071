//! Compiled scanning patterns for untrusted SVG content.
//!
//! # Responsibilities
//! - Compile every sanitizer/auditor regex exactly once
//! - Share the element-matching construction between scripts and other
//!   dangerous elements
//!
//! # Design Decisions
//! - Pattern-based scanning, no DOM: inputs are well-formed vector graphics
//!   and the goal is removal, not semantic validation
//! - The regex crate has no backreferences, so the paired open/close form is
//!   generated per tag name and joined into one alternation

use std::sync::LazyLock;

use regex::Regex;

/// Non-script elements capable of loading external or executable content or
/// hijacking navigation.
pub const DANGEROUS_TAGS: &[&str] = &[
    "iframe",
    "object",
    "embed",
    "applet",
    "foreignObject",
    "base",
    "meta",
    "link",
];

/// URI scheme prefixes that execute code or smuggle inline documents.
pub const DANGEROUS_SCHEMES: &[&str] =
    &["javascript:", "vbscript:", "data:text/html", "data:application/"];

/// Build a regex matching both forms of the given elements: the paired form
/// including its content (`<tag ...> ... </tag>`) and the self-closing form
/// (`<tag ... />`).
fn element_pattern(tags: &[&str]) -> Regex {
    let paired: Vec<String> = tags
        .iter()
        .map(|tag| format!(r"<{tag}\b[^>]*>.*?</{tag}\s*>"))
        .collect();
    let self_closing = format!(r"<(?:{})\b[^>]*/>", tags.join("|"));
    let pattern = format!("(?is){}|{}", paired.join("|"), self_closing);
    Regex::new(&pattern).expect("element pattern must compile")
}

/// Script elements, self-closing or paired, content included.
pub static SCRIPT_ELEMENTS: LazyLock<Regex> = LazyLock::new(|| element_pattern(&["script"]));

/// Dangerous non-script elements, self-closing or paired, content included.
pub static DANGEROUS_ELEMENTS: LazyLock<Regex> =
    LazyLock::new(|| element_pattern(DANGEROUS_TAGS));

/// Event handler attributes (`on*`) bound with single or double quotes.
///
/// Capture 1 is the attribute name, used by the auditor to report distinct
/// handler names.
pub static EVENT_HANDLERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\s+(on[a-z]+)\s*=\s*(?:"[^"]*"|'[^']*')"#).unwrap());

/// Reference-carrying attributes whose value starts with a dangerous scheme.
///
/// Captures 1 (double-quoted) or 2 (single-quoted) hold the matched scheme
/// prefix for the auditor.
pub static DANGEROUS_URLS: LazyLock<Regex> = LazyLock::new(|| {
    let schemes = DANGEROUS_SCHEMES.join("|");
    let pattern = format!(
        r#"(?i)\s+(?:href|xlink:href|src|formaction)\s*=\s*(?:"\s*({schemes})[^"]*"|'\s*({schemes})[^']*')"#
    );
    Regex::new(&pattern).unwrap()
});

/// Presence probes for the auditor, one per dangerous element (script first).
pub static ELEMENT_PROBES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    std::iter::once("script")
        .chain(DANGEROUS_TAGS.iter().copied())
        .map(|tag| {
            let re = Regex::new(&format!(r"(?i)<{tag}\b")).unwrap();
            (tag, re)
        })
        .collect()
});
