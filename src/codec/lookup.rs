//! Reference checks for value → JSON conversion.
//!
//! Serialization must not emit a reference the reading side cannot bind, so
//! every registry-backed reference is looked up in the context first.

use std::fmt;
use std::sync::Arc;

use super::error::SerializationError;
use crate::catalog::{CatalogTable, ObjectIdentifier};
use crate::context::SerdeContext;
use crate::error::ReferenceKind;
use crate::function::{BuiltinFunction, FunctionDefinition};
use crate::types::{
    LogicalType, TypeRoot, MAX_DECIMAL_PRECISION, MAX_TIMESTAMP_PRECISION, MAX_VARCHAR_LENGTH,
};

/// Find a catalog table that is about to be referenced.
pub fn require_table(
    ctx: &SerdeContext,
    identifier: &ObjectIdentifier,
) -> Result<Arc<CatalogTable>, SerializationError> {
    ctx.environment().lookup_table(identifier).ok_or_else(|| {
        SerializationError::unresolved(ReferenceKind::Table, identifier.as_serializable_string())
    })
}

/// Check that a built-in is in the context's operator table.
pub fn require_builtin(
    ctx: &SerdeContext,
    function: &BuiltinFunction,
) -> Result<(), SerializationError> {
    if ctx.operator_table().contains(function) {
        Ok(())
    } else {
        Err(SerializationError::unresolved(ReferenceKind::Function, function.internal_name()))
    }
}

/// Check that a temporary system function is registered under `name`.
pub fn require_system_function(
    ctx: &SerdeContext,
    name: &str,
) -> Result<Arc<FunctionDefinition>, SerializationError> {
    ctx.environment()
        .function_catalog()
        .lookup_temporary_system_function(name)
        .ok_or_else(|| SerializationError::unresolved(ReferenceKind::Function, name))
}

/// Check that a catalog function exists.
pub fn require_catalog_function(
    ctx: &SerdeContext,
    identifier: &ObjectIdentifier,
) -> Result<Arc<FunctionDefinition>, SerializationError> {
    ctx.environment()
        .function_catalog()
        .lookup_catalog_function(identifier)
        .ok_or_else(|| {
            SerializationError::unresolved(
                ReferenceKind::Function,
                identifier.as_serializable_string(),
            )
        })
}

/// Check that `ty` can be written and read back through the context.
///
/// The type must stay within the parser's bounds and nesting limit. Distinct
/// types must be registered in the catalog with the same source type;
/// extension types must be loadable with the same definition.
pub fn check_type_references(
    ctx: &SerdeContext,
    ty: &LogicalType,
) -> Result<(), SerializationError> {
    check_type_bounds(ty, 1, ctx.parser().max_depth())?;
    check_user_types(ctx, ty)
}

fn out_of_bounds(ty: &LogicalType, reason: impl fmt::Display) -> SerializationError {
    SerializationError::unsupported("type", format!("{ty}: {reason}"))
}

/// Mirror of the parser's limits. Distinct and extension types are leaves:
/// only their name is written.
fn check_type_bounds(
    ty: &LogicalType,
    depth: usize,
    max_depth: usize,
) -> Result<(), SerializationError> {
    if depth > max_depth {
        return Err(out_of_bounds(ty, format_args!("type nesting exceeds {max_depth}")));
    }
    match ty.root() {
        TypeRoot::Decimal { precision, scale } => {
            if *precision == 0 || *precision > MAX_DECIMAL_PRECISION {
                return Err(out_of_bounds(
                    ty,
                    format_args!("DECIMAL precision must be between 1 and {MAX_DECIMAL_PRECISION}"),
                ));
            }
            if scale > precision {
                return Err(out_of_bounds(ty, "DECIMAL scale must not exceed precision"));
            }
            Ok(())
        }
        TypeRoot::Char { length } | TypeRoot::Varchar { length }
            if *length == 0 || *length > MAX_VARCHAR_LENGTH =>
        {
            Err(out_of_bounds(
                ty,
                format_args!("length must be between 1 and {MAX_VARCHAR_LENGTH}"),
            ))
        }
        TypeRoot::Timestamp { precision } if *precision > MAX_TIMESTAMP_PRECISION => {
            Err(out_of_bounds(
                ty,
                format_args!(
                    "TIMESTAMP precision must be between 0 and {MAX_TIMESTAMP_PRECISION}"
                ),
            ))
        }
        TypeRoot::Array(element) => check_type_bounds(element, depth + 1, max_depth),
        TypeRoot::Map(key, value) => {
            check_type_bounds(key, depth + 1, max_depth)?;
            check_type_bounds(value, depth + 1, max_depth)
        }
        TypeRoot::Row(fields) => fields
            .iter()
            .try_for_each(|field| check_type_bounds(field.data_type(), depth + 1, max_depth)),
        _ => Ok(()),
    }
}

fn check_user_types(ctx: &SerdeContext, ty: &LogicalType) -> Result<(), SerializationError> {
    match ty.root() {
        TypeRoot::Array(element) => check_user_types(ctx, element),
        TypeRoot::Map(key, value) => {
            check_user_types(ctx, key)?;
            check_user_types(ctx, value)
        }
        TypeRoot::Row(fields) => fields
            .iter()
            .try_for_each(|field| check_user_types(ctx, field.data_type())),
        TypeRoot::Distinct { identifier, source } => {
            let registered = ctx.environment().lookup_type(identifier);
            if registered.as_deref() != Some(source.as_ref()) {
                return Err(SerializationError::unresolved(
                    ReferenceKind::Type,
                    identifier.as_serializable_string(),
                ));
            }
            check_user_types(ctx, source)
        }
        TypeRoot::Extension(extension) => {
            if ctx.extension_loader().contains(extension) {
                Ok(())
            } else {
                Err(SerializationError::unresolved(
                    ReferenceKind::ExtensionClass,
                    extension.class_name(),
                ))
            }
        }
        _ => Ok(()),
    }
}
