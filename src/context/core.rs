//! The serde context: everything a serializer needs to resolve symbolic
//! references.
//!
//! # Usage
//!
//! ```ignore
//! // Empty catalog, default configuration
//! let ctx = configured_serde_context();
//!
//! // Populated catalog, custom configuration
//! let ctx = SerdeContext::builder()
//!     .with_catalog(Arc::new(catalog))
//!     .with_configuration(config)
//!     .build()?;
//!
//! let ty = ctx.resolve_type("ROW<`id` BIGINT NOT NULL>")?;
//! ```

use std::sync::Arc;

use tracing::trace;

use super::builder::ContextBuilder;
use super::loader::ExtensionLoader;
use crate::catalog::{CatalogRegistry, CatalogTable, ObjectIdentifier, UnresolvedIdentifier};
use crate::config::TableConfig;
use crate::function::{FunctionCatalog, OperatorTable};
use crate::types::{
    ExtensionType, LogicalType, TypeFactory, TypeParseError, TypeParser, UserTypeResolver,
};

// =============================================================================
// SymbolEnvironment
// =============================================================================

/// Resolved-symbol environment: configuration, catalog and functions.
#[derive(Debug, Clone)]
pub struct SymbolEnvironment {
    table_config: TableConfig,
    catalog: Arc<dyn CatalogRegistry>,
    functions: FunctionCatalog,
}

impl SymbolEnvironment {
    pub(crate) fn new(
        table_config: TableConfig,
        catalog: Arc<dyn CatalogRegistry>,
        functions: FunctionCatalog,
    ) -> Self {
        Self {
            table_config,
            catalog,
            functions,
        }
    }

    /// The validated configuration.
    pub fn table_config(&self) -> &TableConfig {
        &self.table_config
    }

    /// The catalog registry.
    pub fn catalog(&self) -> &Arc<dyn CatalogRegistry> {
        &self.catalog
    }

    /// The function catalog.
    pub fn function_catalog(&self) -> &FunctionCatalog {
        &self.functions
    }

    /// Look up a table.
    pub fn lookup_table(&self, identifier: &ObjectIdentifier) -> Option<Arc<CatalogTable>> {
        let found = self.catalog.get_table(identifier);
        trace!(%identifier, found = found.is_some(), "lookup table");
        found
    }

    /// Look up the source type of a distinct type.
    pub fn lookup_type(&self, identifier: &ObjectIdentifier) -> Option<Arc<LogicalType>> {
        let found = self.catalog.get_type(identifier);
        trace!(%identifier, found = found.is_some(), "lookup type");
        found
    }

    /// Qualify a partial identifier against the current catalog and database.
    pub fn qualify(&self, identifier: &UnresolvedIdentifier) -> ObjectIdentifier {
        identifier.qualify(self.catalog.current_catalog(), self.catalog.current_database())
    }
}

// =============================================================================
// SerdeContext
// =============================================================================

/// Immutable bundle of registries used to serialize and deserialize plans.
///
/// Cheap to clone; every part is shared. Build one per test with
/// [`configured_serde_context`](super::configured_serde_context) or
/// [`SerdeContext::builder`].
#[derive(Debug, Clone)]
pub struct SerdeContext {
    parser: TypeParser,
    environment: Arc<SymbolEnvironment>,
    loader: Arc<ExtensionLoader>,
    type_factory: Arc<TypeFactory>,
    operator_table: Arc<OperatorTable>,
}

impl SerdeContext {
    /// Create a builder for explicit configuration.
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    pub(crate) fn new(
        parser: TypeParser,
        environment: SymbolEnvironment,
        loader: ExtensionLoader,
        type_factory: Arc<TypeFactory>,
        operator_table: OperatorTable,
    ) -> Self {
        Self {
            parser,
            environment: Arc::new(environment),
            loader: Arc::new(loader),
            type_factory,
            operator_table: Arc::new(operator_table),
        }
    }

    /// Parser handle for type strings and identifiers.
    pub fn parser(&self) -> &TypeParser {
        &self.parser
    }

    /// Resolved-symbol environment.
    pub fn environment(&self) -> &SymbolEnvironment {
        &self.environment
    }

    /// Class-loading handle for extension types.
    pub fn extension_loader(&self) -> &ExtensionLoader {
        &self.loader
    }

    /// Canonical type factory.
    pub fn type_factory(&self) -> &Arc<TypeFactory> {
        &self.type_factory
    }

    /// Built-in operators by internal name.
    pub fn operator_table(&self) -> &OperatorTable {
        &self.operator_table
    }

    /// Shorthand for `environment().table_config()`.
    pub fn table_config(&self) -> &TableConfig {
        self.environment.table_config()
    }

    /// Resolve a type string to its canonical instance.
    ///
    /// Resolving the same string twice yields the same `Arc`.
    pub fn resolve_type(&self, text: &str) -> Result<Arc<LogicalType>, TypeParseError> {
        let ty = self.parser.parse_type(text, self)?;
        Ok(self.type_factory.create_type(ty))
    }

    /// Resolve an identifier string to a fully qualified identifier.
    pub fn resolve_identifier(&self, text: &str) -> Result<ObjectIdentifier, TypeParseError> {
        let identifier = self.parser.parse_identifier(text)?;
        Ok(self.environment.qualify(&identifier))
    }
}

impl UserTypeResolver for SerdeContext {
    fn resolve_distinct(
        &self,
        identifier: &UnresolvedIdentifier,
    ) -> Option<(ObjectIdentifier, LogicalType)> {
        let qualified = self.environment.qualify(identifier);
        let source = self.environment.lookup_type(&qualified)?;
        Some((qualified, LogicalType::clone(&source)))
    }

    fn resolve_extension(&self, class_name: &str) -> Option<Arc<ExtensionType>> {
        let found = self.loader.load(class_name);
        trace!(class_name, found = found.is_some(), "load extension class");
        found
    }
}
