//! Serde context construction.
//!
//! The free functions below are the usual entry points for tests; use
//! [`SerdeContext::builder`] when more control is needed.

mod builder;
mod core;
mod loader;

use std::sync::Arc;

pub use builder::ContextBuilder;
pub use core::{SerdeContext, SymbolEnvironment};
pub use loader::ExtensionLoader;

use crate::catalog::CatalogRegistry;
use crate::config::{Configuration, ConfigurationError, TableConfig};

/// Context with an empty catalog and default configuration.
pub fn configured_serde_context() -> SerdeContext {
    ContextBuilder::new().assemble(TableConfig::default())
}

/// Context with an empty catalog and `configuration` merged into the defaults.
pub fn configured_serde_context_with(
    configuration: &Configuration,
) -> Result<SerdeContext, ConfigurationError> {
    let table_config = TableConfig::from_configuration(configuration)?;
    Ok(ContextBuilder::new().assemble(table_config))
}

/// Context over a caller-supplied catalog, with `configuration` merged into the defaults.
pub fn configured_serde_context_with_catalog(
    catalog: Arc<dyn CatalogRegistry>,
    configuration: &Configuration,
) -> Result<SerdeContext, ConfigurationError> {
    let table_config = TableConfig::from_configuration(configuration)?;
    Ok(configured_serde_context_with_table_config(catalog, table_config))
}

/// Context over a caller-supplied catalog and an already validated configuration.
pub fn configured_serde_context_with_table_config(
    catalog: Arc<dyn CatalogRegistry>,
    table_config: TableConfig,
) -> SerdeContext {
    ContextBuilder::new().with_catalog(catalog).assemble(table_config)
}
