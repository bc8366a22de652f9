//! Logical types, the type-string parser and the canonical type factory.

mod factory;
mod logical;
mod parser;

pub use factory::TypeFactory;
pub use logical::{
    ExtensionType, LogicalType, RowField, TypeRoot, MAX_DECIMAL_PRECISION, MAX_TIMESTAMP_PRECISION,
    MAX_VARCHAR_LENGTH,
};
pub use parser::{NoUserTypes, TypeParseError, TypeParser, UserTypeResolver, DEFAULT_MAX_DEPTH};
