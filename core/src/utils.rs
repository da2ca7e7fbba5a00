//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a secret for `Debug` output.
///
/// - Empty input renders as `EMPTY`.
/// - Input shorter than 12 bytes is entirely replaced by `***`.
/// - Longer input keeps its first and last three characters, so two
///   different master keys can still be told apart in logs.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.len();
        if length == 0 {
            return f.write_str("EMPTY");
        }

        // Secrets are ascii (base64, tokens); fall back to full redaction
        // rather than slicing through a multi-byte char.
        match (self.0.get(..3), self.0.get(length - 3..)) {
            (Some(head), Some(tail)) if length >= 12 => write!(f, "{head}***{tail}"),
            _ => f.write_str("***"),
        }
    }
}
