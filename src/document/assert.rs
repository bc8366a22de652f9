//! Structural assertions over serialized documents.
//!
//! These check presence or absence at a path without decoding the document,
//! which is the only way to tell an omitted field from one written with its
//! default value.

use serde_json::Value;
use thiserror::Error;

use super::pointer::JsonPath;

/// A round-trip or structural check that did not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionFailure {
    /// The restored value differs from the original.
    #[error("round trip changed the value\n  expected: {expected}\n    actual: {actual}")]
    RoundTripMismatch {
        /// Debug form of the original value.
        expected: String,
        /// Debug form of the restored value.
        actual: String,
    },

    /// Serializing the restored value produced different text.
    #[error("serialization is not stable\n   first: {first}\n  second: {second}")]
    Unstable {
        /// Text of the original value.
        first: String,
        /// Text of the restored value.
        second: String,
    },

    /// Nothing non-null at the pointer.
    #[error("serialized document contains no non-null value at pointer '{pointer}':\n{document}")]
    Missing {
        /// The resolved pointer.
        pointer: String,
        /// The pretty-printed document.
        document: String,
    },

    /// A non-null value at the pointer.
    #[error("serialized document contains a non-null value at pointer '{pointer}':\n{document}")]
    Unexpected {
        /// The resolved pointer.
        pointer: String,
        /// The pretty-printed document.
        document: String,
    },
}

/// Whether a non-null value exists at `path`.
pub fn json_contains(document: &Value, path: &JsonPath) -> bool {
    path.resolve(document).is_some_and(|value| !value.is_null())
}

/// Check that a non-null value exists at `path`.
pub fn try_json_contains(
    document: &Value,
    path: impl Into<JsonPath>,
) -> Result<(), AssertionFailure> {
    let path = path.into();
    if json_contains(document, &path) {
        Ok(())
    } else {
        Err(AssertionFailure::Missing {
            pointer: path.to_pointer(),
            document: pretty(document),
        })
    }
}

/// Check that `path` is missing or `null`.
pub fn try_json_does_not_contain(
    document: &Value,
    path: impl Into<JsonPath>,
) -> Result<(), AssertionFailure> {
    let path = path.into();
    if json_contains(document, &path) {
        Err(AssertionFailure::Unexpected {
            pointer: path.to_pointer(),
            document: pretty(document),
        })
    } else {
        Ok(())
    }
}

/// Assert that a non-null value exists at `path`.
///
/// # Panics
///
/// Panics with the pointer and the document otherwise.
#[track_caller]
pub fn assert_json_contains(document: &Value, path: impl Into<JsonPath>) {
    if let Err(failure) = try_json_contains(document, path) {
        panic!("{failure}");
    }
}

/// Assert that `path` is missing or `null`.
///
/// # Panics
///
/// Panics with the pointer and the document otherwise.
#[track_caller]
pub fn assert_json_does_not_contain(document: &Value, path: impl Into<JsonPath>) {
    if let Err(failure) = try_json_does_not_contain(document, path) {
        panic!("{failure}");
    }
}

pub(crate) fn pretty(document: &Value) -> String {
    serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string())
}
