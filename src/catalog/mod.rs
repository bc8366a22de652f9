//! Catalog objects and the registries that resolve them.

mod identifier;
mod registry;
mod table;

pub use identifier::{quote_identifier, ObjectIdentifier, UnresolvedIdentifier};
pub use registry::{CatalogRegistry, EmptyCatalog, InMemoryCatalog};
pub use table::{CatalogTable, Column};
