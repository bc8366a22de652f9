//! Modules providing built-in functions.

use std::fmt;
use std::sync::{Arc, LazyLock};

use rustc_hash::{FxHashMap, FxHashSet};

use super::definition::{BuiltinFunction, FunctionKind};

/// A pluggable provider of built-in functions.
pub trait Module: Send + Sync + fmt::Debug {
    /// Module name, e.g. `core`.
    fn name(&self) -> &str;

    /// Names of all functions this module provides.
    fn list_functions(&self) -> Vec<String>;

    /// Look up a function by SQL name (case-insensitive).
    fn get_function(&self, name: &str) -> Option<Arc<BuiltinFunction>>;
}

const CORE_FUNCTIONS: &[(&str, FunctionKind)] = &[
    ("AND", FunctionKind::Scalar),
    ("OR", FunctionKind::Scalar),
    ("NOT", FunctionKind::Scalar),
    ("=", FunctionKind::Scalar),
    ("<>", FunctionKind::Scalar),
    ("<", FunctionKind::Scalar),
    ("<=", FunctionKind::Scalar),
    (">", FunctionKind::Scalar),
    (">=", FunctionKind::Scalar),
    ("+", FunctionKind::Scalar),
    ("-", FunctionKind::Scalar),
    ("*", FunctionKind::Scalar),
    ("/", FunctionKind::Scalar),
    ("IS NULL", FunctionKind::Scalar),
    ("IS NOT NULL", FunctionKind::Scalar),
    ("CAST", FunctionKind::Scalar),
    ("UPPER", FunctionKind::Scalar),
    ("LOWER", FunctionKind::Scalar),
    ("CONCAT", FunctionKind::Scalar),
    ("COALESCE", FunctionKind::Scalar),
    ("COUNT", FunctionKind::Aggregate),
    ("SUM", FunctionKind::Aggregate),
    ("MIN", FunctionKind::Aggregate),
    ("MAX", FunctionKind::Aggregate),
    ("AVG", FunctionKind::Aggregate),
];

/// Shared built-ins of the core module, keyed by upper-case name.
static CORE: LazyLock<FxHashMap<String, Arc<BuiltinFunction>>> = LazyLock::new(|| {
    CORE_FUNCTIONS
        .iter()
        .map(|&(name, kind)| (name.to_string(), Arc::new(BuiltinFunction::new(name, 1, kind))))
        .collect()
});

/// The module every context loads: logic, comparison, arithmetic, string
/// and aggregate built-ins.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreModule;

impl Module for CoreModule {
    fn name(&self) -> &str {
        "core"
    }

    fn list_functions(&self) -> Vec<String> {
        CORE_FUNCTIONS.iter().map(|(name, _)| name.to_string()).collect()
    }

    fn get_function(&self, name: &str) -> Option<Arc<BuiltinFunction>> {
        CORE.get(&name.to_ascii_uppercase()).cloned()
    }
}

/// Ordered set of loaded modules; earlier modules win on name clashes.
#[derive(Debug, Clone)]
pub struct ModuleManager {
    modules: Vec<Arc<dyn Module>>,
}

impl Default for ModuleManager {
    fn default() -> Self {
        Self {
            modules: vec![Arc::new(CoreModule)],
        }
    }
}

impl ModuleManager {
    /// Create a manager with the core module loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module after the already loaded ones.
    pub fn load_module(&mut self, module: Arc<dyn Module>) {
        self.modules.push(module);
    }

    /// Loaded modules, in resolution order.
    pub fn modules(&self) -> impl Iterator<Item = &Arc<dyn Module>> {
        self.modules.iter()
    }

    /// Look up a built-in by SQL name across all modules.
    pub fn get_function(&self, name: &str) -> Option<Arc<BuiltinFunction>> {
        self.modules.iter().find_map(|m| m.get_function(name))
    }

    /// All built-ins, first definition per internal name.
    pub fn functions(&self) -> Vec<Arc<BuiltinFunction>> {
        let mut seen = FxHashSet::default();
        let mut functions = Vec::new();
        for module in &self.modules {
            for name in module.list_functions() {
                let Some(function) = module.get_function(&name) else {
                    continue;
                };
                if seen.insert(function.internal_name()) {
                    functions.push(function);
                }
            }
        }
        functions
    }
}
