//! Logical types and their serializable string form.

use std::fmt;
use std::sync::Arc;

use crate::catalog::{quote_identifier, ObjectIdentifier};

/// Maximum precision of `DECIMAL`.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Maximum fractional-second precision of `TIMESTAMP`.
pub const MAX_TIMESTAMP_PRECISION: u8 = 9;

/// Length of `STRING`, i.e. `VARCHAR` without a practical limit.
pub const MAX_VARCHAR_LENGTH: u32 = i32::MAX as u32;

/// A user-defined type backed by an implementation class.
///
/// Extension types are not self-describing in a plan: only the class name is
/// written, and the [`ExtensionLoader`](crate::context::ExtensionLoader) of the
/// deserializing context must know the class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionType {
    class_name: String,
    description: String,
}

impl ExtensionType {
    /// Create a new extension type.
    pub fn new(class_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            description: description.into(),
        }
    }

    /// Fully qualified implementation class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Human readable description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A named field of a `ROW` type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowField {
    name: String,
    data_type: LogicalType,
}

impl RowField {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field type.
    pub fn data_type(&self) -> &LogicalType {
        &self.data_type
    }
}

/// The kind of a logical type, without nullability.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRoot {
    Boolean,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal { precision: u8, scale: u8 },
    Char { length: u32 },
    Varchar { length: u32 },
    Date,
    Timestamp { precision: u8 },
    Array(Box<LogicalType>),
    Map(Box<LogicalType>, Box<LogicalType>),
    Row(Vec<RowField>),
    /// A distinct type registered in a catalog, with its source type.
    Distinct {
        identifier: ObjectIdentifier,
        source: Box<LogicalType>,
    },
    /// A type provided by an implementation class.
    Extension(Arc<ExtensionType>),
}

/// A logical type: a [`TypeRoot`] plus nullability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalType {
    nullable: bool,
    root: TypeRoot,
}

impl LogicalType {
    /// Create a nullable type.
    pub fn new(root: TypeRoot) -> Self {
        Self { nullable: true, root }
    }

    /// Copy of this type with the given nullability.
    pub fn with_nullability(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Copy of this type marked `NOT NULL`.
    pub fn not_null(self) -> Self {
        self.with_nullability(false)
    }

    /// Whether the type accepts `NULL`.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The type root.
    pub fn root(&self) -> &TypeRoot {
        &self.root
    }
}

// Nullable constructors, one per root.
#[allow(missing_docs)]
impl LogicalType {
    pub fn boolean() -> Self {
        Self::new(TypeRoot::Boolean)
    }

    pub fn tinyint() -> Self {
        Self::new(TypeRoot::TinyInt)
    }

    pub fn smallint() -> Self {
        Self::new(TypeRoot::SmallInt)
    }

    pub fn int() -> Self {
        Self::new(TypeRoot::Int)
    }

    pub fn bigint() -> Self {
        Self::new(TypeRoot::BigInt)
    }

    pub fn float() -> Self {
        Self::new(TypeRoot::Float)
    }

    pub fn double() -> Self {
        Self::new(TypeRoot::Double)
    }

    pub fn decimal(precision: u8, scale: u8) -> Self {
        Self::new(TypeRoot::Decimal { precision, scale })
    }

    pub fn char(length: u32) -> Self {
        Self::new(TypeRoot::Char { length })
    }

    pub fn varchar(length: u32) -> Self {
        Self::new(TypeRoot::Varchar { length })
    }

    /// `VARCHAR` of maximum length.
    pub fn string() -> Self {
        Self::varchar(MAX_VARCHAR_LENGTH)
    }

    pub fn date() -> Self {
        Self::new(TypeRoot::Date)
    }

    pub fn timestamp(precision: u8) -> Self {
        Self::new(TypeRoot::Timestamp { precision })
    }

    pub fn array(element: LogicalType) -> Self {
        Self::new(TypeRoot::Array(Box::new(element)))
    }

    pub fn map(key: LogicalType, value: LogicalType) -> Self {
        Self::new(TypeRoot::Map(Box::new(key), Box::new(value)))
    }

    pub fn row(fields: impl IntoIterator<Item = RowField>) -> Self {
        Self::new(TypeRoot::Row(fields.into_iter().collect()))
    }

    pub fn distinct(identifier: ObjectIdentifier, source: LogicalType) -> Self {
        Self::new(TypeRoot::Distinct {
            identifier,
            source: Box::new(source),
        })
    }

    pub fn extension(extension: Arc<ExtensionType>) -> Self {
        Self::new(TypeRoot::Extension(extension))
    }
}

impl LogicalType {
    /// Whether the type is one of the integer types.
    pub fn is_integer(&self) -> bool {
        matches!(
            self.root,
            TypeRoot::TinyInt | TypeRoot::SmallInt | TypeRoot::Int | TypeRoot::BigInt
        )
    }

    /// Inclusive value range of an integer type.
    pub fn integer_range(&self) -> Option<(i64, i64)> {
        match self.root {
            TypeRoot::TinyInt => Some((i8::MIN.into(), i8::MAX.into())),
            TypeRoot::SmallInt => Some((i16::MIN.into(), i16::MAX.into())),
            TypeRoot::Int => Some((i32::MIN.into(), i32::MAX.into())),
            TypeRoot::BigInt => Some((i64::MIN, i64::MAX)),
            _ => None,
        }
    }

    /// The string written into serialized plans.
    ///
    /// This is the canonical [`Display`](fmt::Display) form and parses back
    /// into an equal type with [`TypeParser`](super::TypeParser).
    pub fn as_serializable_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            TypeRoot::Boolean => f.write_str("BOOLEAN")?,
            TypeRoot::TinyInt => f.write_str("TINYINT")?,
            TypeRoot::SmallInt => f.write_str("SMALLINT")?,
            TypeRoot::Int => f.write_str("INT")?,
            TypeRoot::BigInt => f.write_str("BIGINT")?,
            TypeRoot::Float => f.write_str("FLOAT")?,
            TypeRoot::Double => f.write_str("DOUBLE")?,
            TypeRoot::Decimal { precision, scale } => write!(f, "DECIMAL({precision}, {scale})")?,
            TypeRoot::Char { length } => write!(f, "CHAR({length})")?,
            TypeRoot::Varchar { length } => write!(f, "VARCHAR({length})")?,
            TypeRoot::Date => f.write_str("DATE")?,
            TypeRoot::Timestamp { precision } => write!(f, "TIMESTAMP({precision})")?,
            TypeRoot::Array(element) => write!(f, "ARRAY<{element}>")?,
            TypeRoot::Map(key, value) => write!(f, "MAP<{key}, {value}>")?,
            TypeRoot::Row(fields) => {
                f.write_str("ROW<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} {}", quote_identifier(&field.name), field.data_type)?;
                }
                f.write_str(">")?;
            }
            TypeRoot::Distinct { identifier, .. } => {
                f.write_str(&identifier.as_serializable_string())?
            }
            TypeRoot::Extension(ext) => {
                write!(f, "EXTENSION('{}')", ext.class_name.replace('\'', "''"))?
            }
        }
        if !self.nullable {
            f.write_str(" NOT NULL")?;
        }
        Ok(())
    }
}
