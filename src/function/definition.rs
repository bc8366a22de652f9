//! Function definitions.

use std::fmt;

/// Kind of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    /// One row in, one value out.
    Scalar,
    /// Many rows in, one value out.
    Aggregate,
    /// One row in, many rows out.
    Table,
}

/// A function or operator provided by a module.
///
/// Built-ins are referenced in plans by their internal name
/// `$NAME$VERSION`, e.g. `$UPPER$1` or `$=$1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuiltinFunction {
    name: String,
    version: u32,
    kind: FunctionKind,
}

impl BuiltinFunction {
    /// Create a new built-in.
    pub fn new(name: impl Into<String>, version: u32, kind: FunctionKind) -> Self {
        Self {
            name: name.into(),
            version,
            kind,
        }
    }

    /// SQL name, e.g. `UPPER` or `=`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version of the built-in's semantics.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Function kind.
    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    /// The internal name written into serialized plans.
    pub fn internal_name(&self) -> String {
        format!("${}${}", self.name, self.version)
    }
}

impl fmt::Display for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.internal_name())
    }
}

/// Split an internal name `$NAME$VERSION` into name and version.
pub fn parse_internal_name(internal: &str) -> Option<(&str, u32)> {
    let rest = internal.strip_prefix('$')?;
    let (name, version) = rest.rsplit_once('$')?;
    if name.is_empty() {
        return None;
    }
    Some((name, version.parse().ok()?))
}

/// A user-defined function registered in a catalog or as a temporary
/// system function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionDefinition {
    name: String,
    kind: FunctionKind,
    deterministic: bool,
}

impl FunctionDefinition {
    /// Create a deterministic function definition.
    pub fn new(name: impl Into<String>, kind: FunctionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            deterministic: true,
        }
    }

    /// Mark the function as non-deterministic.
    pub fn non_deterministic(mut self) -> Self {
        self.deterministic = false;
        self
    }

    /// Function name as registered.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Function kind.
    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    /// Whether the function always returns the same result for the same input.
    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }
}
