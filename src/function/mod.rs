//! Functions, modules and the operator table.

mod catalog;
mod definition;
mod module;
mod operator;

pub use catalog::FunctionCatalog;
pub use definition::{parse_internal_name, BuiltinFunction, FunctionDefinition, FunctionKind};
pub use module::{CoreModule, Module, ModuleManager};
pub use operator::OperatorTable;
