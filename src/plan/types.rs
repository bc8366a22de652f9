//! Types and identifiers as symbolic references.
//!
//! Both are written as their canonical strings and re-bound against the
//! context when read, so user-defined types and partial identifiers resolve
//! through the reading side's registries.

use std::sync::Arc;

use serde_json::Value;

use crate::catalog::ObjectIdentifier;
use crate::codec::{
    check_type_references, DeserializationError, JsonDeserialize, JsonSerialize, Node,
    SerializationError,
};
use crate::context::SerdeContext;
use crate::types::{LogicalType, TypeParseError};

fn parse_error(
    node: &Node<'_>,
    expected: &'static str,
    error: TypeParseError,
) -> DeserializationError {
    match error {
        TypeParseError::Unresolved { kind, name } => node.unresolved(expected, kind, name),
        syntax @ TypeParseError::Syntax { .. } => node.invalid(expected, syntax.to_string()),
    }
}

impl JsonSerialize for LogicalType {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        check_type_references(ctx, self)?;
        Ok(Value::String(self.as_serializable_string()))
    }
}

impl JsonSerialize for Arc<LogicalType> {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        self.as_ref().serialize_json(ctx)
    }
}

impl JsonDeserialize for Arc<LogicalType> {
    const EXPECTED: &'static str = "logical type";

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let text = node.as_str(Self::EXPECTED)?;
        ctx.resolve_type(text)
            .map_err(|e| parse_error(&node, Self::EXPECTED, e))
    }
}

impl JsonDeserialize for LogicalType {
    const EXPECTED: &'static str = "logical type";

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let ty: Arc<LogicalType> = node.parse(ctx)?;
        Ok(LogicalType::clone(&ty))
    }
}

impl JsonSerialize for ObjectIdentifier {
    fn serialize_json(&self, _ctx: &SerdeContext) -> Result<Value, SerializationError> {
        Ok(Value::String(self.as_serializable_string()))
    }
}

impl JsonDeserialize for ObjectIdentifier {
    const EXPECTED: &'static str = "object identifier";

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let text = node.as_str(Self::EXPECTED)?;
        ctx.resolve_identifier(text)
            .map_err(|e| parse_error(&node, Self::EXPECTED, e))
    }
}
