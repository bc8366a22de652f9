//! Value → JSON serialization.

use serde_json::{Map, Value};
use tracing::trace;

use super::error::SerializationError;
use crate::context::SerdeContext;
use crate::document::SerializedDocument;

/// A value that can be written against a [`SerdeContext`].
///
/// Implementations resolve every symbolic reference they embed through the
/// context and fail with [`SerializationError::UnresolvedReference`] when the
/// context does not know it.
pub trait JsonSerialize {
    /// Write this value as a JSON tree.
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError>;
}

/// Serialize a value to JSON text.
///
/// Note: `null` members are stripped from objects, so an unset optional
/// field never appears in the output.
pub fn to_json<T>(ctx: &SerdeContext, value: &T) -> Result<String, SerializationError>
where
    T: JsonSerialize + ?Sized,
{
    Ok(to_document(ctx, value)?.into_text())
}

/// Serialize a value to text plus its parsed tree.
pub fn to_document<T>(
    ctx: &SerdeContext,
    value: &T,
) -> Result<SerializedDocument, SerializationError>
where
    T: JsonSerialize + ?Sized,
{
    let tree = strip_nulls(value.serialize_json(ctx)?);
    let document = SerializedDocument::from_tree(tree);
    trace!(text = document.text(), "serialized");
    Ok(document)
}

/// Recursively strip `null` members from JSON objects.
///
/// Array elements are kept so positions stay stable.
pub fn strip_nulls(json: Value) -> Value {
    match json {
        Value::Object(obj) => {
            let filtered: Map<String, Value> = obj
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect();
            Value::Object(filtered)
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

/// Serialize a plain-data value through its `serde` implementation.
///
/// For values that embed no symbolic references.
pub fn serialize_plain<T>(value: &T) -> Result<Value, SerializationError>
where
    T: serde::Serialize + ?Sized,
{
    Ok(serde_json::to_value(value)?)
}

// =============================================================================
// Implementations for std types
// =============================================================================

impl JsonSerialize for bool {
    fn serialize_json(&self, _ctx: &SerdeContext) -> Result<Value, SerializationError> {
        Ok(Value::Bool(*self))
    }
}

macro_rules! impl_serialize_for_integer {
    ($($ty:ty),*) => {
        $(
            impl JsonSerialize for $ty {
                fn serialize_json(&self, _ctx: &SerdeContext) -> Result<Value, SerializationError> {
                    Ok(Value::from(*self))
                }
            }
        )*
    };
}

impl_serialize_for_integer!(i32, i64, u32, u64);

impl JsonSerialize for f64 {
    fn serialize_json(&self, _ctx: &SerdeContext) -> Result<Value, SerializationError> {
        serde_json::Number::from_f64(*self)
            .map(Value::Number)
            .ok_or_else(|| {
                SerializationError::unsupported("double", format!("{self} has no JSON form"))
            })
    }
}

impl JsonSerialize for str {
    fn serialize_json(&self, _ctx: &SerdeContext) -> Result<Value, SerializationError> {
        Ok(Value::String(self.to_string()))
    }
}

impl JsonSerialize for String {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        self.as_str().serialize_json(ctx)
    }
}

impl<T: JsonSerialize> JsonSerialize for [T] {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        let items = self
            .iter()
            .map(|item| item.serialize_json(ctx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(items))
    }
}

impl<T: JsonSerialize> JsonSerialize for Vec<T> {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        self.as_slice().serialize_json(ctx)
    }
}

impl<T: JsonSerialize> JsonSerialize for Option<T> {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        match self {
            Some(value) => value.serialize_json(ctx),
            None => Ok(Value::Null),
        }
    }
}

impl<T: JsonSerialize + ?Sized> JsonSerialize for Box<T> {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        (**self).serialize_json(ctx)
    }
}

impl<T: JsonSerialize + ?Sized> JsonSerialize for &T {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        (**self).serialize_json(ctx)
    }
}
