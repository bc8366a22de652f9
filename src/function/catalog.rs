//! Function catalog: temporary system functions, catalog functions and
//! module built-ins behind one lookup surface.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use super::definition::{BuiltinFunction, FunctionDefinition};
use super::module::ModuleManager;
use crate::catalog::{CatalogRegistry, ObjectIdentifier, UnresolvedIdentifier};

/// Resolves function names the way a planner does.
#[derive(Debug, Clone)]
pub struct FunctionCatalog {
    catalog: Arc<dyn CatalogRegistry>,
    modules: ModuleManager,
    temporary_system: FxHashMap<String, Arc<FunctionDefinition>>,
}

impl FunctionCatalog {
    /// Create a function catalog over `catalog` and `modules`.
    pub fn new(catalog: Arc<dyn CatalogRegistry>, modules: ModuleManager) -> Self {
        Self {
            catalog,
            modules,
            temporary_system: FxHashMap::default(),
        }
    }

    /// Register a temporary system function; names are case-insensitive.
    ///
    /// Returns the previous definition under that name, if any.
    pub fn register_temporary_system_function(
        &mut self,
        name: &str,
        function: FunctionDefinition,
    ) -> Option<Arc<FunctionDefinition>> {
        self.temporary_system
            .insert(name.to_ascii_lowercase(), Arc::new(function))
    }

    /// Look up a temporary system function.
    pub fn lookup_temporary_system_function(&self, name: &str) -> Option<Arc<FunctionDefinition>> {
        let found = self.temporary_system.get(&name.to_ascii_lowercase()).cloned();
        trace!(name, found = found.is_some(), "lookup temporary system function");
        found
    }

    /// Look up a function registered in the catalog.
    pub fn lookup_catalog_function(
        &self,
        identifier: &ObjectIdentifier,
    ) -> Option<Arc<FunctionDefinition>> {
        let found = self.catalog.get_function(identifier);
        trace!(%identifier, found = found.is_some(), "lookup catalog function");
        found
    }

    /// Look up a built-in by SQL name across loaded modules.
    pub fn lookup_builtin(&self, name: &str) -> Option<Arc<BuiltinFunction>> {
        self.modules.get_function(name)
    }

    /// Qualify a possibly partial identifier against the current catalog and database.
    pub fn qualify(&self, identifier: &UnresolvedIdentifier) -> ObjectIdentifier {
        identifier.qualify(self.catalog.current_catalog(), self.catalog.current_database())
    }

    /// Names of all temporary system functions, sorted.
    pub fn temporary_system_functions(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.temporary_system.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The loaded modules.
    pub fn modules(&self) -> &ModuleManager {
        &self.modules
    }
}
