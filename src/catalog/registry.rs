//! Catalog registry trait and implementations.
//!
//! Provides the lookup capability a serializer needs for catalog objects,
//! without depending on a production catalog.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::identifier::ObjectIdentifier;
use super::table::CatalogTable;
use crate::function::FunctionDefinition;
use crate::types::LogicalType;

// =============================================================================
// CatalogRegistry Trait
// =============================================================================

/// Lookup-by-qualified-name capability of a catalog.
///
/// This is the extension point for resolving catalog references in plans:
/// tables, user-defined functions and distinct types.
///
/// # Example
///
/// ```
/// use plan_serde_harness::catalog::{
///     CatalogRegistry, CatalogTable, Column, InMemoryCatalog, ObjectIdentifier,
/// };
/// use plan_serde_harness::types::LogicalType;
///
/// let catalog = InMemoryCatalog::new("cat", "db")
///     .with_table("orders", CatalogTable::new([Column::new("id", LogicalType::bigint())]));
///
/// let id = ObjectIdentifier::new("cat", "db", "orders");
/// assert!(catalog.get_table(&id).is_some());
/// ```
pub trait CatalogRegistry: Send + Sync + fmt::Debug {
    /// Catalog used to qualify one- and two-part names.
    fn current_catalog(&self) -> &str;

    /// Database used to qualify one-part names.
    fn current_database(&self) -> &str;

    /// Look up a table.
    fn get_table(&self, identifier: &ObjectIdentifier) -> Option<Arc<CatalogTable>>;

    /// Look up a user-defined function.
    fn get_function(&self, identifier: &ObjectIdentifier) -> Option<Arc<FunctionDefinition>>;

    /// Look up the source type of a distinct type.
    fn get_type(&self, identifier: &ObjectIdentifier) -> Option<Arc<LogicalType>>;

    /// All table identifiers, sorted.
    fn list_tables(&self) -> Vec<ObjectIdentifier>;

    /// All function identifiers, sorted.
    fn list_functions(&self) -> Vec<ObjectIdentifier>;

    /// All distinct type identifiers, sorted.
    fn list_types(&self) -> Vec<ObjectIdentifier>;
}

// =============================================================================
// EmptyCatalog - Default Implementation
// =============================================================================

/// Catalog without any objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyCatalog {
    catalog: String,
    database: String,
}

impl EmptyCatalog {
    /// Create an empty catalog with the given current catalog and database.
    pub fn new(catalog: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            database: database.into(),
        }
    }
}

impl CatalogRegistry for EmptyCatalog {
    fn current_catalog(&self) -> &str {
        &self.catalog
    }

    fn current_database(&self) -> &str {
        &self.database
    }

    fn get_table(&self, _identifier: &ObjectIdentifier) -> Option<Arc<CatalogTable>> {
        None
    }

    fn get_function(&self, _identifier: &ObjectIdentifier) -> Option<Arc<FunctionDefinition>> {
        None
    }

    fn get_type(&self, _identifier: &ObjectIdentifier) -> Option<Arc<LogicalType>> {
        None
    }

    fn list_tables(&self) -> Vec<ObjectIdentifier> {
        Vec::new()
    }

    fn list_functions(&self) -> Vec<ObjectIdentifier> {
        Vec::new()
    }

    fn list_types(&self) -> Vec<ObjectIdentifier> {
        Vec::new()
    }
}

// =============================================================================
// InMemoryCatalog - Map-based Implementation
// =============================================================================

/// A populated, map-based catalog for tests.
///
/// Names passed to the `with_*` methods are registered in the current
/// catalog and database; use the `*_at` variants for other locations.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    catalog: String,
    database: String,
    tables: FxHashMap<ObjectIdentifier, Arc<CatalogTable>>,
    functions: FxHashMap<ObjectIdentifier, Arc<FunctionDefinition>>,
    types: FxHashMap<ObjectIdentifier, Arc<LogicalType>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog with the given current catalog and database.
    pub fn new(catalog: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            database: database.into(),
            tables: FxHashMap::default(),
            functions: FxHashMap::default(),
            types: FxHashMap::default(),
        }
    }

    fn local(&self, name: impl Into<String>) -> ObjectIdentifier {
        ObjectIdentifier::new(self.catalog.as_str(), self.database.as_str(), name)
    }

    /// Register a table in the current database.
    pub fn with_table(self, name: impl Into<String>, table: CatalogTable) -> Self {
        let id = self.local(name);
        self.with_table_at(id, table)
    }

    /// Register a table under a fully qualified identifier.
    pub fn with_table_at(mut self, identifier: ObjectIdentifier, table: CatalogTable) -> Self {
        self.tables.insert(identifier, Arc::new(table));
        self
    }

    /// Register a function in the current database.
    pub fn with_function(self, name: impl Into<String>, function: FunctionDefinition) -> Self {
        let id = self.local(name);
        self.with_function_at(id, function)
    }

    /// Register a function under a fully qualified identifier.
    pub fn with_function_at(
        mut self,
        identifier: ObjectIdentifier,
        function: FunctionDefinition,
    ) -> Self {
        self.functions.insert(identifier, Arc::new(function));
        self
    }

    /// Register a distinct type in the current database.
    pub fn with_type(self, name: impl Into<String>, source: LogicalType) -> Self {
        let id = self.local(name);
        self.with_type_at(id, source)
    }

    /// Register a distinct type under a fully qualified identifier.
    pub fn with_type_at(mut self, identifier: ObjectIdentifier, source: LogicalType) -> Self {
        self.types.insert(identifier, Arc::new(source));
        self
    }
}

fn sorted_keys<V>(map: &FxHashMap<ObjectIdentifier, V>) -> Vec<ObjectIdentifier> {
    let mut keys: Vec<_> = map.keys().cloned().collect();
    keys.sort();
    keys
}

impl CatalogRegistry for InMemoryCatalog {
    fn current_catalog(&self) -> &str {
        &self.catalog
    }

    fn current_database(&self) -> &str {
        &self.database
    }

    fn get_table(&self, identifier: &ObjectIdentifier) -> Option<Arc<CatalogTable>> {
        self.tables.get(identifier).cloned()
    }

    fn get_function(&self, identifier: &ObjectIdentifier) -> Option<Arc<FunctionDefinition>> {
        self.functions.get(identifier).cloned()
    }

    fn get_type(&self, identifier: &ObjectIdentifier) -> Option<Arc<LogicalType>> {
        self.types.get(identifier).cloned()
    }

    fn list_tables(&self) -> Vec<ObjectIdentifier> {
        sorted_keys(&self.tables)
    }

    fn list_functions(&self) -> Vec<ObjectIdentifier> {
        sorted_keys(&self.functions)
    }

    fn list_types(&self) -> Vec<ObjectIdentifier> {
        sorted_keys(&self.types)
    }
}
