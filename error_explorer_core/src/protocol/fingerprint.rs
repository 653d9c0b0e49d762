/**
 * Stable deduplication keys for reported events.
 *
 * A fingerprint is an opaque 32-character hex string derived from the
 * identity of an error (type, file, line) or a custom message (content,
 * level). The backend groups occurrences by this key, so the same crash
 * site always maps to the same issue.
 *
 * The digest is md5 — a fast 128-bit hash used purely for identity, not
 * for security. Collisions are tolerated, determinism is required.
 */
use std::fmt;

use crate::protocol::levels::LogLevel;

/**
 * An opaque, fixed-length dedup key.
 *
 * Construct via `from_exception` or `from_message`; the inner value is a
 * lowercase hex md5 digest.
 */
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /**
     * Fingerprint for an error event.
     *
     * Identity triple: error type name, source file, source line.
     * Two errors raised at the same site with the same type always
     * collapse to the same fingerprint regardless of their message.
     */
    pub fn from_exception(type_name: &str, file: &str, line: u32) -> Self {
        let identity = format!("{type_name}:{file}:{line}");
        Self(format!("{:x}", md5::compute(identity.as_bytes())))
    }

    /**
     * Fingerprint for a custom message event.
     *
     * Two-stage hash: the message content is digested first, then combined
     * with a constant tag and the severity level. This bounds the identity
     * string length while still depending on the full message content.
     */
    pub fn from_message(message: &str, level: LogLevel) -> Self {
        let inner = format!("{:x}", md5::compute(message.as_bytes()));
        let identity = format!("CustomMessage:{level}:{inner}");
        Self(format!("{:x}", md5::compute(identity.as_bytes())))
    }

    /// The hex digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_fingerprint_is_deterministic() {
        let a = Fingerprint::from_exception("std::io::Error", "src/main.rs", 42);
        let b = Fingerprint::from_exception("std::io::Error", "src/main.rs", 42);
        assert_eq!(a, b);
    }

    /**
     * Varying any single field of the identity triple must change the
     * fingerprint.
     */
    #[test]
    fn test_exception_fingerprint_depends_on_each_field() {
        let base = Fingerprint::from_exception("std::io::Error", "src/main.rs", 42);

        assert_ne!(base, Fingerprint::from_exception("ParseError", "src/main.rs", 42));
        assert_ne!(base, Fingerprint::from_exception("std::io::Error", "src/lib.rs", 42));
        assert_ne!(base, Fingerprint::from_exception("std::io::Error", "src/main.rs", 43));
    }

    #[test]
    fn test_message_fingerprint_is_deterministic() {
        let a = Fingerprint::from_message("cache miss storm", LogLevel::Warning);
        let b = Fingerprint::from_message("cache miss storm", LogLevel::Warning);
        assert_eq!(a, b);
    }

    #[test]
    fn test_message_fingerprint_depends_on_level_and_content() {
        let base = Fingerprint::from_message("cache miss storm", LogLevel::Warning);

        assert_ne!(base, Fingerprint::from_message("cache miss storm", LogLevel::Error));
        assert_ne!(base, Fingerprint::from_message("cache hit storm", LogLevel::Warning));
    }

    /// Fingerprints are fixed-length lowercase hex.
    #[test]
    fn test_fingerprint_shape() {
        let fp = Fingerprint::from_exception("E", "f.rs", 1);
        assert_eq!(fp.as_str().len(), 32);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
