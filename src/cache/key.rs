//! Content-addressed cache keys.
//!
//! Keys are derived from the document bytes plus the option flags that
//! change the produced result, so identical requests map to the same entry
//! regardless of arrival order or caller identity.

use blake3::Hasher;

/// A 256-bit content+options hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    /// Derive the key for a request.
    pub fn for_request(content: &str, camel_case: bool, sanitize: bool) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(content.as_bytes());
        let flags = (camel_case as u8) | ((sanitize as u8) << 1);
        hasher.update(&[flags]);
        Self(*hasher.finalize().as_bytes())
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 16 hex chars are plenty for log correlation.
        let hex = blake3::Hash::from(self.0).to_hex();
        write!(f, "{}", &hex.as_str()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_inputs_same_key() {
        let a = CacheKey::for_request("<svg/>", true, true);
        let b = CacheKey::for_request("<svg/>", true, true);
        assert_eq!(a, b);
    }

    #[test]
    fn test_content_changes_key() {
        let a = CacheKey::for_request("<svg/>", true, true);
        let b = CacheKey::for_request("<svg></svg>", true, true);
        assert_ne!(a, b);
    }

    #[test]
    fn test_options_change_key() {
        let base = CacheKey::for_request("<svg/>", true, true);
        assert_ne!(base, CacheKey::for_request("<svg/>", false, true));
        assert_ne!(base, CacheKey::for_request("<svg/>", true, false));
        assert_ne!(base, CacheKey::for_request("<svg/>", false, false));
    }

    #[test]
    fn test_display_is_short_hex() {
        let key = CacheKey::for_request("<svg/>", true, true);
        let shown = key.to_string();
        assert_eq!(shown.len(), 16);
        assert!(shown.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
