//! JSON object builder utilities.
//!
//! Helpers for writing plan fragments with an explicit omission policy.

use serde_json::{Map, Value};

use super::error::SerializationError;
use super::serialize::JsonSerialize;
use crate::context::SerdeContext;

/// Builder for JSON objects whose members are serialized against a context.
///
/// # Example
///
/// ```ignore
/// use plan_serde_harness::codec::ObjectBuilder;
///
/// let json = ObjectBuilder::new(ctx)
///     .field("table", &self.table)?
///     .field_opt("limit", self.limit.as_ref())?
///     .field_nonempty("filters", &self.filters)?
///     .build();
/// ```
pub struct ObjectBuilder<'a> {
    ctx: &'a SerdeContext,
    fields: Map<String, Value>,
}

impl<'a> ObjectBuilder<'a> {
    /// Create an empty builder.
    pub fn new(ctx: &'a SerdeContext) -> Self {
        Self {
            ctx,
            fields: Map::new(),
        }
    }

    /// Add a member.
    pub fn field<K, V>(mut self, key: K, value: &V) -> Result<Self, SerializationError>
    where
        K: Into<String>,
        V: JsonSerialize + ?Sized,
    {
        let value = value.serialize_json(self.ctx)?;
        self.fields.insert(key.into(), value);
        Ok(self)
    }

    /// Add a member only when `value` is set.
    pub fn field_opt<K, V>(self, key: K, value: Option<&V>) -> Result<Self, SerializationError>
    where
        K: Into<String>,
        V: JsonSerialize + ?Sized,
    {
        match value {
            Some(value) => self.field(key, value),
            None => Ok(self),
        }
    }

    /// Add an array member only when `values` is non-empty.
    pub fn field_nonempty<K, V>(self, key: K, values: &[V]) -> Result<Self, SerializationError>
    where
        K: Into<String>,
        V: JsonSerialize,
    {
        if values.is_empty() {
            Ok(self)
        } else {
            self.field(key, values)
        }
    }

    /// Add a member that is already JSON (no conversion).
    pub fn field_raw<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Build the JSON object.
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}
