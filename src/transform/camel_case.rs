//! Hyphenated attribute name conversion.
//!
//! # Responsibilities
//! - Rewrite `stroke-width`-style attribute names to `strokeWidth`
//! - Leave attribute values and single-segment names untouched
//!
//! # Design Decisions
//! - Matches only in attribute position (preceded by whitespace, followed
//!   by `=`), so hyphens inside values survive
//! - Idempotent: camelCase output contains no hyphens for a second pass to
//!   match

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Hyphen-separated lowercase attribute names in attribute position.
static HYPHENATED_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s)([a-z][a-z0-9]*(?:-[a-z0-9]+)+)(\s*=)").unwrap());

/// Concatenate hyphen-separated segments, capitalizing all but the first.
fn camelize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, segment) in name.split('-').enumerate() {
        if i == 0 {
            out.push_str(segment);
        } else {
            let mut chars = segment.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

/// Rewrite every hyphenated attribute name in the document to camelCase.
pub fn to_camel_case(doc: &str) -> String {
    match HYPHENATED_ATTR.replace_all(doc, |caps: &Captures<'_>| {
        format!("{}{}{}", &caps[1], camelize(&caps[2]), &caps[3])
    }) {
        Cow::Borrowed(_) => doc.to_string(),
        Cow::Owned(converted) => converted,
    }
}
