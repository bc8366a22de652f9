//! Harness error type.

use std::fmt;

use thiserror::Error;

use crate::codec::{DeserializationError, SerializationError};
use crate::config::ConfigurationError;
use crate::document::AssertionFailure;

/// Kind of a symbolic reference that must be resolved against a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// A catalog table.
    Table,
    /// A built-in, temporary system or catalog function.
    Function,
    /// A distinct type.
    Type,
    /// An extension type implementation class.
    ExtensionClass,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Function => "function",
            Self::Type => "type",
            Self::ExtensionClass => "extension class",
        })
    }
}

/// Error type for a single harness check.
///
/// Every variant is terminal for the test case it occurs in: serialization
/// is a pure function of context and value, so nothing is retried.
///
/// # Example
///
/// ```ignore
/// match try_round_trip(&ctx, &spec) {
///     Ok(restored) => { /* equal to spec */ }
///     Err(HarnessError::Serialization(e)) => eprintln!("cannot write plan: {e}"),
///     Err(HarnessError::Assertion(failure)) => panic!("{failure}"),
///     Err(e) => panic!("{e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The context could not be built.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The value could not be written.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The text could not be read back.
    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    /// A round-trip or structural check did not hold.
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
}

impl HarnessError {
    /// Whether this is a failed check rather than an error in producing the data to check.
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }

    /// The assertion failure, if this is one.
    pub fn assertion(&self) -> Option<&AssertionFailure> {
        match self {
            Self::Assertion(failure) => Some(failure),
            _ => None,
        }
    }
}
