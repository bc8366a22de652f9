//! Row expressions: input references, literals and calls.
//!
//! # JSON shape
//!
//! ```text
//! {"kind": "INPUT_REF", "inputIndex": 0, "type": "INT"}
//! {"kind": "LITERAL", "value": "abc", "type": "VARCHAR(3)"}      // "value" omitted for NULL
//! {"kind": "CALL", "internalName": "$UPPER$1", "operands": [..], "type": ".."}
//! ```
//!
//! A call names its function with exactly one of `internalName` (built-in),
//! `systemName` (temporary system function) or `catalogName`.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde_json::Value;

use crate::catalog::ObjectIdentifier;
use crate::codec::{
    require_builtin, require_catalog_function, require_system_function, DeserializationError,
    JsonDeserialize, JsonSerialize, Node, ObjectBuilder, SerializationError,
};
use crate::context::SerdeContext;
use crate::error::ReferenceKind;
use crate::function::BuiltinFunction;
use crate::types::{LogicalType, TypeRoot, MAX_TIMESTAMP_PRECISION};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const KIND: &str = "kind";
const TYPE: &str = "type";
const INTERNAL_NAME: &str = "internalName";
const SYSTEM_NAME: &str = "systemName";
const CATALOG_NAME: &str = "catalogName";

// =============================================================================
// FunctionRef
// =============================================================================

/// The function a call invokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionRef {
    /// A built-in from the operator table.
    Builtin(BuiltinFunction),
    /// A temporary system function, by name.
    TemporarySystem(String),
    /// A function registered in a catalog.
    Catalog(ObjectIdentifier),
}

impl FunctionRef {
    /// Look up a built-in by internal name, e.g. `$UPPER$1`.
    pub fn builtin(ctx: &SerdeContext, internal_name: &str) -> Option<Self> {
        ctx.operator_table()
            .lookup(internal_name)
            .map(|f| Self::Builtin(BuiltinFunction::clone(f)))
    }

    /// Write the naming member into `builder`.
    fn write<'a>(
        &self,
        builder: ObjectBuilder<'a>,
        ctx: &SerdeContext,
    ) -> Result<ObjectBuilder<'a>, SerializationError> {
        match self {
            Self::Builtin(function) => {
                require_builtin(ctx, function)?;
                builder.field(INTERNAL_NAME, &function.internal_name())
            }
            Self::TemporarySystem(name) => {
                require_system_function(ctx, name)?;
                builder.field(SYSTEM_NAME, name)
            }
            Self::Catalog(identifier) => {
                require_catalog_function(ctx, identifier)?;
                builder.field(CATALOG_NAME, identifier)
            }
        }
    }
}

impl JsonSerialize for FunctionRef {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        Ok(self.write(ObjectBuilder::new(ctx), ctx)?.build())
    }
}

impl JsonDeserialize for FunctionRef {
    const EXPECTED: &'static str = "function reference";

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let obj = node.object(Self::EXPECTED)?;
        let functions = ctx.environment().function_catalog();

        if let Some(name_node) = obj.get(INTERNAL_NAME) {
            let name = name_node.as_str(Self::EXPECTED)?;
            return ctx
                .operator_table()
                .lookup(name)
                .map(|f| Self::Builtin(BuiltinFunction::clone(f)))
                .ok_or_else(|| name_node.unresolved(Self::EXPECTED, ReferenceKind::Function, name));
        }

        if let Some(name_node) = obj.get(SYSTEM_NAME) {
            let name = name_node.as_str(Self::EXPECTED)?;
            return match functions.lookup_temporary_system_function(name) {
                Some(_) => Ok(Self::TemporarySystem(name.to_string())),
                None => Err(name_node.unresolved(Self::EXPECTED, ReferenceKind::Function, name)),
            };
        }

        if let Some(name_node) = obj.get(CATALOG_NAME) {
            let identifier: ObjectIdentifier = name_node.clone().parse(ctx)?;
            return match functions.lookup_catalog_function(&identifier) {
                Some(_) => Ok(Self::Catalog(identifier)),
                None => Err(name_node.unresolved(
                    Self::EXPECTED,
                    ReferenceKind::Function,
                    identifier.as_serializable_string(),
                )),
            };
        }

        Err(obj.node().invalid(
            Self::EXPECTED,
            format!("expected one of '{INTERNAL_NAME}', '{SYSTEM_NAME}' or '{CATALOG_NAME}'"),
        ))
    }
}

// =============================================================================
// Literals
// =============================================================================

/// Value of a literal, interpreted by the literal's type.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// SQL `NULL`.
    Null,
    /// BOOLEAN.
    Boolean(bool),
    /// TINYINT, SMALLINT, INT or BIGINT.
    Integer(i64),
    /// FLOAT or DOUBLE; must be finite.
    Double(f64),
    /// CHAR or VARCHAR.
    String(String),
    /// DATE.
    Date(NaiveDate),
    /// TIMESTAMP.
    Timestamp(NaiveDateTime),
}

/// A typed constant.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    value: LiteralValue,
    data_type: Arc<LogicalType>,
}

impl Literal {
    /// Create a literal; the value is checked against the type when written.
    pub fn new(value: LiteralValue, data_type: impl Into<Arc<LogicalType>>) -> Self {
        Self {
            value,
            data_type: data_type.into(),
        }
    }

    /// A typed `NULL`.
    pub fn null(data_type: impl Into<Arc<LogicalType>>) -> Self {
        Self::new(LiteralValue::Null, data_type)
    }

    /// The value.
    pub fn value(&self) -> &LiteralValue {
        &self.value
    }

    /// The type.
    pub fn data_type(&self) -> &Arc<LogicalType> {
        &self.data_type
    }

    fn encode_value(&self) -> Result<Value, SerializationError> {
        let ty = self.data_type.as_ref();
        let mismatch = || {
            SerializationError::unsupported(
                "literal",
                format!("{:?} is not a value of type {ty}", self.value),
            )
        };
        let root = value_root(ty);

        match &self.value {
            LiteralValue::Null if ty.is_nullable() => Ok(Value::Null),
            LiteralValue::Null => Err(SerializationError::unsupported(
                "literal",
                format!("NULL is not a value of type {ty}"),
            )),
            LiteralValue::Boolean(b) if matches!(root, TypeRoot::Boolean) => Ok(Value::Bool(*b)),
            LiteralValue::Integer(i) => match integer_range(root) {
                Some((min, max)) if (min..=max).contains(i) => Ok(Value::from(*i)),
                _ => Err(mismatch()),
            },
            LiteralValue::Double(d) => match root {
                TypeRoot::Double if d.is_finite() => Ok(Value::from(*d)),
                TypeRoot::Float if d.is_finite() && f64::from(*d as f32) == *d => {
                    Ok(Value::from(*d))
                }
                _ => Err(mismatch()),
            },
            LiteralValue::String(s) => match root {
                TypeRoot::Char { length } | TypeRoot::Varchar { length }
                    if s.chars().count() <= *length as usize =>
                {
                    Ok(Value::String(s.clone()))
                }
                _ => Err(mismatch()),
            },
            LiteralValue::Date(date) if matches!(root, TypeRoot::Date) => {
                Ok(Value::String(date.format(DATE_FORMAT).to_string()))
            }
            LiteralValue::Timestamp(ts) => match root {
                TypeRoot::Timestamp { precision } if fits_precision(ts, *precision) => {
                    Ok(Value::String(ts.format(TIMESTAMP_FORMAT).to_string()))
                }
                _ => Err(mismatch()),
            },
            _ => Err(mismatch()),
        }
    }

    fn decode_value(
        node: Option<Node<'_>>,
        ty: &LogicalType,
        owner: &Node<'_>,
    ) -> Result<LiteralValue, DeserializationError> {
        const EXPECTED: &str = Literal::EXPECTED;
        let Some(node) = node else {
            return if ty.is_nullable() {
                Ok(LiteralValue::Null)
            } else {
                Err(owner.invalid(EXPECTED, format!("missing value for type {ty}")))
            };
        };

        let root = value_root(ty);
        let value = match root {
            TypeRoot::Boolean => LiteralValue::Boolean(node.as_bool(EXPECTED)?),
            TypeRoot::TinyInt | TypeRoot::SmallInt | TypeRoot::Int | TypeRoot::BigInt => {
                let i = node.as_i64(EXPECTED)?;
                match integer_range(root) {
                    Some((min, max)) if (min..=max).contains(&i) => LiteralValue::Integer(i),
                    _ => {
                        return Err(node.invalid(EXPECTED, format!("{i} is out of range for {ty}")))
                    }
                }
            }
            TypeRoot::Float | TypeRoot::Double => LiteralValue::Double(node.as_f64(EXPECTED)?),
            TypeRoot::Char { length } | TypeRoot::Varchar { length } => {
                let s = node.as_str(EXPECTED)?;
                if s.chars().count() > *length as usize {
                    return Err(node.invalid(EXPECTED, format!("string longer than {length}")));
                }
                LiteralValue::String(s.to_string())
            }
            TypeRoot::Date => {
                let s = node.as_str(EXPECTED)?;
                let date = NaiveDate::parse_from_str(s, DATE_FORMAT)
                    .map_err(|e| node.invalid(EXPECTED, format!("'{s}': {e}")))?;
                LiteralValue::Date(date)
            }
            TypeRoot::Timestamp { .. } => {
                let s = node.as_str(EXPECTED)?;
                let ts = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
                    .map_err(|e| node.invalid(EXPECTED, format!("'{s}': {e}")))?;
                LiteralValue::Timestamp(ts)
            }
            _ => return Err(node.invalid(EXPECTED, format!("no literals of type {ty}"))),
        };
        Ok(value)
    }
}

/// The root that decides how a literal's value is encoded.
fn value_root(ty: &LogicalType) -> &TypeRoot {
    match ty.root() {
        TypeRoot::Distinct { source, .. } => value_root(source),
        root => root,
    }
}

fn integer_range(root: &TypeRoot) -> Option<(i64, i64)> {
    LogicalType::new(root.clone()).integer_range()
}

fn fits_precision(ts: &NaiveDateTime, precision: u8) -> bool {
    let unit = 10u32.pow(u32::from(MAX_TIMESTAMP_PRECISION.saturating_sub(precision)));
    ts.nanosecond() < 1_000_000_000 && ts.nanosecond() % unit == 0
}

impl JsonSerialize for Literal {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        let value = self.encode_value()?;
        let mut builder = ObjectBuilder::new(ctx).field_raw(KIND, Value::from("LITERAL"));
        if !value.is_null() {
            builder = builder.field_raw("value", value);
        }
        Ok(builder.field(TYPE, &self.data_type)?.build())
    }
}

impl JsonDeserialize for Literal {
    const EXPECTED: &'static str = "literal";

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let obj = node.object(Self::EXPECTED)?;
        let data_type: Arc<LogicalType> = obj.required(ctx, TYPE)?;
        let value = Self::decode_value(obj.get("value"), &data_type, obj.node())?;
        Ok(Self { value, data_type })
    }
}

// =============================================================================
// Expr
// =============================================================================

/// A row expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A field of the input row.
    InputRef {
        /// Zero-based field index.
        index: u32,
        /// Type of the field.
        data_type: Arc<LogicalType>,
    },
    /// A constant.
    Literal(Literal),
    /// A function call.
    Call {
        /// The function.
        function: FunctionRef,
        /// Arguments, in order.
        operands: Vec<Expr>,
        /// Result type.
        data_type: Arc<LogicalType>,
    },
}

impl Expr {
    /// Reference input field `index`.
    pub fn input_ref(index: u32, data_type: impl Into<Arc<LogicalType>>) -> Self {
        Self::InputRef {
            index,
            data_type: data_type.into(),
        }
    }

    /// A constant.
    pub fn literal(value: LiteralValue, data_type: impl Into<Arc<LogicalType>>) -> Self {
        Self::Literal(Literal::new(value, data_type))
    }

    /// Call `function` with `operands`.
    pub fn call(
        function: FunctionRef,
        operands: Vec<Expr>,
        data_type: impl Into<Arc<LogicalType>>,
    ) -> Self {
        Self::Call {
            function,
            operands,
            data_type: data_type.into(),
        }
    }

    /// Result type.
    pub fn data_type(&self) -> &Arc<LogicalType> {
        match self {
            Self::InputRef { data_type, .. } | Self::Call { data_type, .. } => data_type,
            Self::Literal(literal) => literal.data_type(),
        }
    }
}

impl JsonSerialize for Expr {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        match self {
            Self::InputRef { index, data_type } => Ok(ObjectBuilder::new(ctx)
                .field_raw(KIND, Value::from("INPUT_REF"))
                .field("inputIndex", index)?
                .field(TYPE, data_type)?
                .build()),
            Self::Literal(literal) => literal.serialize_json(ctx),
            Self::Call {
                function,
                operands,
                data_type,
            } => {
                let builder = ObjectBuilder::new(ctx).field_raw(KIND, Value::from("CALL"));
                Ok(function
                    .write(builder, ctx)?
                    .field("operands", operands)?
                    .field(TYPE, data_type)?
                    .build())
            }
        }
    }
}

impl JsonDeserialize for Expr {
    const EXPECTED: &'static str = "expression";

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let obj = node.object(Self::EXPECTED)?;
        let kind_node = obj.required_node(KIND)?;
        match kind_node.as_str(Self::EXPECTED)? {
            "INPUT_REF" => Ok(Self::InputRef {
                index: obj.required(ctx, "inputIndex")?,
                data_type: obj.required(ctx, TYPE)?,
            }),
            "LITERAL" => node.parse(ctx).map(Self::Literal),
            "CALL" => Ok(Self::Call {
                function: obj.node().clone().parse(ctx)?,
                operands: obj.list_or_empty(ctx, "operands")?,
                data_type: obj.required(ctx, TYPE)?,
            }),
            other => Err(kind_node.invalid(Self::EXPECTED, format!("unknown kind '{other}'"))),
        }
    }
}
