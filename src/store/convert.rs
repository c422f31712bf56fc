//! Typed coercion of raw store values.

use crate::error::{CacheError, CacheResult};

/// Interpret a stored string as a boolean.
///
/// Only the four literal forms the store is expected to hold are
/// accepted; anything else is a [`CacheError::TypeMismatch`].
pub(crate) fn bool_from_raw(key: &str, raw: &str) -> CacheResult<bool> {
    match raw {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(CacheError::TypeMismatch {
            key: key.to_string(),
            expected: "bool",
            found: other.to_string(),
        }),
    }
}

/// Interpret a stored string as a base-10 integer.
///
/// `None` on parse failure; the caller substitutes its default.
pub(crate) fn int_from_raw(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}
