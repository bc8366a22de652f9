//! Operator table: built-ins by internal name.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{parse_internal_name, BuiltinFunction};
use super::module::ModuleManager;

/// Lookup table for built-in operators and functions referenced by
/// internal name (`$NAME$VERSION`) in serialized plans.
#[derive(Debug, Clone, Default)]
pub struct OperatorTable {
    operators: FxHashMap<String, Arc<BuiltinFunction>>,
}

impl OperatorTable {
    /// Build the table from every function of the loaded modules.
    pub fn from_modules(modules: &ModuleManager) -> Self {
        let operators = modules
            .functions()
            .into_iter()
            .map(|f| (f.internal_name(), f))
            .collect();
        Self { operators }
    }

    /// Look up by internal name, e.g. `$UPPER$1`.
    pub fn lookup(&self, internal_name: &str) -> Option<&Arc<BuiltinFunction>> {
        // Names are case-insensitive, versions are not.
        let (name, version) = parse_internal_name(internal_name)?;
        self.operators
            .get(internal_name)
            .or_else(|| self.operators.get(&format!("${}${version}", name.to_ascii_uppercase())))
    }

    /// Whether the table contains exactly this built-in.
    pub fn contains(&self, function: &BuiltinFunction) -> bool {
        self.operators
            .get(&function.internal_name())
            .is_some_and(|f| f.as_ref() == function)
    }

    /// Internal names of all operators, sorted.
    pub fn internal_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.operators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of operators.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}
