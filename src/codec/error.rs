//! Error types for codec operations.

use thiserror::Error;

use crate::error::ReferenceKind;

/// Error while writing a value.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// The value references something the context does not know.
    #[error("cannot serialize reference to unknown {kind} '{name}'")]
    UnresolvedReference {
        /// Kind of the missing reference.
        kind: ReferenceKind,
        /// The reference as it would have been written.
        name: String,
    },

    /// The value cannot be represented.
    #[error("cannot serialize {what}: {reason}")]
    Unsupported {
        /// What was being written.
        what: &'static str,
        /// Why it cannot be.
        reason: String,
    },

    /// Rendering the tree to text failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SerializationError {
    pub(crate) fn unresolved(kind: ReferenceKind, name: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn unsupported(what: &'static str, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            what,
            reason: reason.into(),
        }
    }
}

/// Error while reading a value.
///
/// Every variant names the type being read and where; `pointer` is the JSON
/// pointer of the offending node (`""` for the document root).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeserializationError {
    /// The text is not well-formed JSON.
    #[error("invalid JSON for {expected} at line {line}, column {column}: {message}")]
    Syntax {
        /// Type being read.
        expected: &'static str,
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// A node has the wrong JSON type.
    #[error("expected {expected} at '{pointer}', found {found}")]
    UnexpectedType {
        /// What the node should have been.
        expected: &'static str,
        /// JSON type of the node.
        found: &'static str,
        /// Location of the node.
        pointer: String,
    },

    /// A required member is absent.
    #[error("missing field '{field}' of {expected} at '{pointer}'")]
    MissingField {
        /// Type being read.
        expected: &'static str,
        /// The missing member.
        field: String,
        /// Location of the enclosing object.
        pointer: String,
    },

    /// A node has the right JSON type but an invalid value.
    #[error("invalid {expected} at '{pointer}': {message}")]
    InvalidValue {
        /// Type being read.
        expected: &'static str,
        /// Location of the node.
        pointer: String,
        /// What is wrong with it.
        message: String,
    },

    /// The document references something the context does not know.
    #[error("cannot resolve {kind} '{name}' for {expected} at '{pointer}'")]
    UnresolvedReference {
        /// Type being read.
        expected: &'static str,
        /// Kind of the missing reference.
        kind: ReferenceKind,
        /// The reference as written.
        name: String,
        /// Location of the reference.
        pointer: String,
    },
}

impl DeserializationError {
    /// The type that was being read.
    pub fn expected(&self) -> &'static str {
        match self {
            Self::Syntax { expected, .. }
            | Self::UnexpectedType { expected, .. }
            | Self::MissingField { expected, .. }
            | Self::InvalidValue { expected, .. }
            | Self::UnresolvedReference { expected, .. } => expected,
        }
    }

    /// JSON pointer of the failure; `None` for syntax errors.
    pub fn pointer(&self) -> Option<&str> {
        match self {
            Self::Syntax { .. } => None,
            Self::UnexpectedType { pointer, .. }
            | Self::MissingField { pointer, .. }
            | Self::InvalidValue { pointer, .. }
            | Self::UnresolvedReference { pointer, .. } => Some(pointer),
        }
    }

    pub(crate) fn syntax(expected: &'static str, error: &serde_json::Error) -> Self {
        let full = error.to_string();
        let suffix = format!(" at line {} column {}", error.line(), error.column());
        let message = full.strip_suffix(suffix.as_str()).unwrap_or(&full).to_string();
        Self::Syntax {
            expected,
            line: error.line(),
            column: error.column(),
            message,
        }
    }
}
