//! Utility functions and types.

use std::fmt::Debug;
use std::fmt::Formatter;

/// Redact hides secrets like access key secrets and STS tokens in `Debug` output.
///
/// - Empty or absent values print as `EMPTY`.
/// - Values shorter than 12 bytes are fully hidden.
/// - Longer values keep their first and last three characters so that
///   different keys can still be told apart in logs.
pub struct Redact<'a>(Option<&'a str>);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(Some(value))
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(Some(value.as_str()))
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let v = self.0.unwrap_or_default();
        let length = v.len();

        if length == 0 {
            return f.write_str("EMPTY");
        }
        if length < 12 || !v.is_char_boundary(3) || !v.is_char_boundary(length - 3) {
            return f.write_str("***");
        }

        write!(f, "{}***{}", &v[..3], &v[length - 3..])
    }
}
