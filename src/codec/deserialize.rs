//! JSON → value deserialization.

use serde_json::{Map, Value};
use tracing::trace;

use super::error::DeserializationError;
use crate::context::SerdeContext;
use crate::document::JsonPath;
use crate::error::ReferenceKind;

/// A value that can be read back against a [`SerdeContext`].
pub trait JsonDeserialize: Sized {
    /// Name of the type in error messages.
    const EXPECTED: &'static str;

    /// Read a value from `node`, resolving symbolic references through `ctx`.
    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError>;
}

/// Deserialize a value of type `T` from JSON text.
pub fn to_object<T: JsonDeserialize>(
    ctx: &SerdeContext,
    json: &str,
) -> Result<T, DeserializationError> {
    let tree: Value =
        serde_json::from_str(json).map_err(|e| DeserializationError::syntax(T::EXPECTED, &e))?;
    trace!(expected = T::EXPECTED, "deserializing");
    T::deserialize_json(ctx, Node::root(&tree))
}

/// Deserialize a plain-data value through its `serde` implementation.
pub fn deserialize_plain<'a, T>(
    node: &Node<'a>,
    expected: &'static str,
) -> Result<T, DeserializationError>
where
    T: serde::Deserialize<'a>,
{
    T::deserialize(node.value()).map_err(|e| node.invalid(expected, e.to_string()))
}

// =============================================================================
// Node
// =============================================================================

/// A JSON value together with its location in the document.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    value: &'a Value,
    path: JsonPath,
}

impl<'a> Node<'a> {
    /// The document root.
    pub fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: JsonPath::root(),
        }
    }

    /// The JSON value.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Location of this node.
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// Whether the value is `null`.
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    /// Read this node as `T`.
    pub fn parse<T: JsonDeserialize>(self, ctx: &SerdeContext) -> Result<T, DeserializationError> {
        T::deserialize_json(ctx, self)
    }

    /// Read this node as an object.
    pub fn object(&self, expected: &'static str) -> Result<ObjectReader<'a>, DeserializationError> {
        let map = self
            .value
            .as_object()
            .ok_or_else(|| self.unexpected_type(expected))?;
        Ok(ObjectReader {
            expected,
            node: self.clone(),
            map,
        })
    }

    /// The elements of an array node.
    pub fn elements(&self, expected: &'static str) -> Result<Vec<Node<'a>>, DeserializationError> {
        let items = self
            .value
            .as_array()
            .ok_or_else(|| self.unexpected_type(expected))?;
        Ok(items
            .iter()
            .enumerate()
            .map(|(i, value)| Node {
                value,
                path: self.path.index(i),
            })
            .collect())
    }

    /// Read a string.
    pub fn as_str(&self, expected: &'static str) -> Result<&'a str, DeserializationError> {
        self.value.as_str().ok_or_else(|| self.unexpected_type(expected))
    }

    /// Read a boolean.
    pub fn as_bool(&self, expected: &'static str) -> Result<bool, DeserializationError> {
        self.value.as_bool().ok_or_else(|| self.unexpected_type(expected))
    }

    /// Read a signed integer.
    pub fn as_i64(&self, expected: &'static str) -> Result<i64, DeserializationError> {
        match self.value {
            Value::Number(n) => n.as_i64().ok_or_else(|| {
                self.invalid(expected, format!("{n} is not a 64-bit signed integer"))
            }),
            _ => Err(self.unexpected_type(expected)),
        }
    }

    /// Read an unsigned integer.
    pub fn as_u64(&self, expected: &'static str) -> Result<u64, DeserializationError> {
        match self.value {
            Value::Number(n) => n.as_u64().ok_or_else(|| {
                self.invalid(expected, format!("{n} is not a 64-bit unsigned integer"))
            }),
            _ => Err(self.unexpected_type(expected)),
        }
    }

    /// Read a number as a double.
    pub fn as_f64(&self, expected: &'static str) -> Result<f64, DeserializationError> {
        self.value.as_f64().ok_or_else(|| self.unexpected_type(expected))
    }

    /// Error: the node has the wrong JSON type.
    pub fn unexpected_type(&self, expected: &'static str) -> DeserializationError {
        DeserializationError::UnexpectedType {
            expected,
            found: json_type_name(self.value),
            pointer: self.path.to_pointer(),
        }
    }

    /// Error: the node holds an invalid value.
    pub fn invalid(
        &self,
        expected: &'static str,
        message: impl Into<String>,
    ) -> DeserializationError {
        DeserializationError::InvalidValue {
            expected,
            pointer: self.path.to_pointer(),
            message: message.into(),
        }
    }

    /// Error: the node references something the context does not know.
    pub fn unresolved(
        &self,
        expected: &'static str,
        kind: ReferenceKind,
        name: impl Into<String>,
    ) -> DeserializationError {
        DeserializationError::UnresolvedReference {
            expected,
            kind,
            name: name.into(),
            pointer: self.path.to_pointer(),
        }
    }

    fn child(&self, key: &str, value: &'a Value) -> Node<'a> {
        Node {
            value,
            path: self.path.field(key),
        }
    }
}

/// Get JSON type name for error messages.
fn json_type_name(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// ObjectReader
// =============================================================================

/// Member access on an object node, reporting errors against the type being read.
#[derive(Debug, Clone)]
pub struct ObjectReader<'a> {
    expected: &'static str,
    node: Node<'a>,
    map: &'a Map<String, Value>,
}

impl<'a> ObjectReader<'a> {
    /// The object node itself.
    pub fn node(&self) -> &Node<'a> {
        &self.node
    }

    /// A member; absent and `null` members are both `None`.
    pub fn get(&self, key: &str) -> Option<Node<'a>> {
        self.map
            .get(key)
            .filter(|value| !value.is_null())
            .map(|value| self.node.child(key, value))
    }

    /// All members in key order, including `null` ones.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, Node<'a>)> + '_ {
        self.map
            .iter()
            .map(|(key, value)| (key.as_str(), self.node.child(key, value)))
    }

    /// Whether a non-null member exists.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// A member that must be present.
    pub fn required_node(&self, key: &str) -> Result<Node<'a>, DeserializationError> {
        self.get(key).ok_or_else(|| DeserializationError::MissingField {
            expected: self.expected,
            field: key.to_string(),
            pointer: self.node.path.to_pointer(),
        })
    }

    /// Read a required member.
    pub fn required<T: JsonDeserialize>(
        &self,
        ctx: &SerdeContext,
        key: &str,
    ) -> Result<T, DeserializationError> {
        self.required_node(key)?.parse(ctx)
    }

    /// Read an optional member.
    pub fn optional<T: JsonDeserialize>(
        &self,
        ctx: &SerdeContext,
        key: &str,
    ) -> Result<Option<T>, DeserializationError> {
        self.get(key).map(|node| node.parse(ctx)).transpose()
    }

    /// Read an array member that is omitted when empty.
    pub fn list_or_empty<T: JsonDeserialize>(
        &self,
        ctx: &SerdeContext,
        key: &str,
    ) -> Result<Vec<T>, DeserializationError> {
        Ok(self.optional(ctx, key)?.unwrap_or_default())
    }

    /// Read a required string member.
    pub fn str(&self, key: &str) -> Result<&'a str, DeserializationError> {
        self.required_node(key)?.as_str(self.expected)
    }
}

// =============================================================================
// Implementations for std types
// =============================================================================

impl JsonDeserialize for bool {
    const EXPECTED: &'static str = "boolean";

    fn deserialize_json(_ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        node.as_bool(Self::EXPECTED)
    }
}

impl JsonDeserialize for i64 {
    const EXPECTED: &'static str = "64-bit integer";

    fn deserialize_json(_ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        node.as_i64(Self::EXPECTED)
    }
}

impl JsonDeserialize for u64 {
    const EXPECTED: &'static str = "64-bit unsigned integer";

    fn deserialize_json(_ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        node.as_u64(Self::EXPECTED)
    }
}

impl JsonDeserialize for i32 {
    const EXPECTED: &'static str = "32-bit integer";

    fn deserialize_json(_ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let value = node.as_i64(Self::EXPECTED)?;
        i32::try_from(value)
            .map_err(|_| node.invalid(Self::EXPECTED, format!("{value} is out of range")))
    }
}

impl JsonDeserialize for u32 {
    const EXPECTED: &'static str = "32-bit unsigned integer";

    fn deserialize_json(_ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let value = node.as_u64(Self::EXPECTED)?;
        u32::try_from(value)
            .map_err(|_| node.invalid(Self::EXPECTED, format!("{value} is out of range")))
    }
}

impl JsonDeserialize for f64 {
    const EXPECTED: &'static str = "double";

    fn deserialize_json(_ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        node.as_f64(Self::EXPECTED)
    }
}

impl JsonDeserialize for String {
    const EXPECTED: &'static str = "string";

    fn deserialize_json(_ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        node.as_str(Self::EXPECTED).map(str::to_string)
    }
}

impl<T: JsonDeserialize> JsonDeserialize for Vec<T> {
    const EXPECTED: &'static str = "array";

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        node.elements(Self::EXPECTED)?
            .into_iter()
            .map(|element| element.parse(ctx))
            .collect()
    }
}

impl<T: JsonDeserialize> JsonDeserialize for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        if node.is_null() {
            Ok(None)
        } else {
            node.parse(ctx).map(Some)
        }
    }
}

impl<T: JsonDeserialize> JsonDeserialize for Box<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        node.parse(ctx).map(Box::new)
    }
}
