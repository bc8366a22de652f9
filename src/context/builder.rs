//! Builder pattern for `SerdeContext`.

use std::sync::Arc;

use tracing::debug;

use super::core::{SerdeContext, SymbolEnvironment};
use super::loader::ExtensionLoader;
use crate::catalog::{CatalogRegistry, EmptyCatalog};
use crate::config::{Configuration, ConfigurationError, TableConfig};
use crate::function::{FunctionCatalog, FunctionDefinition, Module, ModuleManager, OperatorTable};
use crate::types::{ExtensionType, TypeFactory, TypeParser};

/// Source of the context's configuration.
enum ConfigSource {
    /// Raw key/values, merged into the defaults at build time.
    Raw(Configuration),
    /// Already validated.
    Validated(TableConfig),
}

/// Builder for configuring `SerdeContext`.
///
/// Use `SerdeContext::builder()` to create a builder.
pub struct ContextBuilder {
    catalog: Option<Arc<dyn CatalogRegistry>>,
    config: ConfigSource,
    type_factory: Option<Arc<TypeFactory>>,
    parser: TypeParser,
    modules: Vec<Arc<dyn Module>>,
    extensions: Vec<ExtensionType>,
    system_functions: Vec<(String, FunctionDefinition)>,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    /// Create a new builder: empty catalog, default configuration, global type factory.
    pub fn new() -> Self {
        Self {
            catalog: None,
            config: ConfigSource::Validated(TableConfig::default()),
            type_factory: None,
            parser: TypeParser::default(),
            modules: Vec::new(),
            extensions: Vec::new(),
            system_functions: Vec::new(),
        }
    }

    // =========================================================================
    // Registries
    // =========================================================================

    /// Resolve catalog references against `catalog` instead of an empty catalog.
    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogRegistry>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Use a private type factory instead of the process-wide one.
    ///
    /// Best for: tests asserting on interning, or running fully isolated.
    pub fn with_type_factory(mut self, factory: Arc<TypeFactory>) -> Self {
        self.type_factory = Some(factory);
        self
    }

    /// Use a custom type parser, e.g. with a different nesting limit.
    pub fn with_parser(mut self, parser: TypeParser) -> Self {
        self.parser = parser;
        self
    }

    /// Load an additional module after the core module.
    pub fn with_module(mut self, module: Arc<dyn Module>) -> Self {
        self.modules.push(module);
        self
    }

    /// Make an extension type loadable.
    pub fn with_extension_type(mut self, extension: ExtensionType) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Register a temporary system function.
    pub fn with_temporary_system_function(
        mut self,
        name: impl Into<String>,
        function: FunctionDefinition,
    ) -> Self {
        self.system_functions.push((name.into(), function));
        self
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Merge `configuration` into the defaults when building.
    ///
    /// Unknown keys are ignored; malformed values of known keys fail `build`.
    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.config = ConfigSource::Raw(configuration);
        self
    }

    /// Use an already validated configuration.
    pub fn with_table_config(mut self, table_config: TableConfig) -> Self {
        self.config = ConfigSource::Validated(table_config);
        self
    }

    /// Build the `SerdeContext`.
    ///
    /// The configuration is merged into the defaults exactly once, and the
    /// resulting `TableConfig` is the one every registry sees.
    pub fn build(self) -> Result<SerdeContext, ConfigurationError> {
        let table_config = match &self.config {
            ConfigSource::Raw(configuration) => TableConfig::from_configuration(configuration)?,
            ConfigSource::Validated(table_config) => table_config.clone(),
        };
        Ok(self.assemble(table_config))
    }

    /// Build from a validated configuration; cannot fail.
    pub(crate) fn assemble(self, table_config: TableConfig) -> SerdeContext {
        let catalog = self.catalog.unwrap_or_else(|| {
            Arc::new(EmptyCatalog::new(
                table_config.builtin_catalog(),
                table_config.builtin_database(),
            ))
        });

        let mut modules = ModuleManager::new();
        for module in self.modules {
            modules.load_module(module);
        }
        let operator_table = OperatorTable::from_modules(&modules);

        let mut functions = FunctionCatalog::new(Arc::clone(&catalog), modules);
        for (name, function) in self.system_functions {
            functions.register_temporary_system_function(&name, function);
        }

        let mut loader = ExtensionLoader::new();
        for extension in self.extensions {
            loader.register(extension);
        }

        debug!(
            catalog = catalog.current_catalog(),
            database = catalog.current_database(),
            operators = operator_table.len(),
            extensions = loader.class_names().len(),
            compilation = table_config.catalog_plan_compilation().as_str(),
            restore = table_config.catalog_plan_restore().as_str(),
            "built serde context"
        );

        let environment = SymbolEnvironment::new(table_config, catalog, functions);
        SerdeContext::new(
            self.parser,
            environment,
            loader,
            self.type_factory.unwrap_or_else(TypeFactory::global),
            operator_table,
        )
    }
}
