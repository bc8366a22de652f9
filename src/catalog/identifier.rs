//! Catalog object identifiers.

use std::fmt;

/// Fully qualified identifier of a catalog object (`catalog.database.object`).
///
/// The serializable form quotes every part with backticks, doubling any
/// backtick inside a part: `` `cat`.`db`.`my``table` ``.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectIdentifier {
    catalog: String,
    database: String,
    object: String,
}

impl ObjectIdentifier {
    /// Create a new identifier.
    pub fn new(
        catalog: impl Into<String>,
        database: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            catalog: catalog.into(),
            database: database.into(),
            object: object.into(),
        }
    }

    /// Catalog name.
    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    /// Database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Object name.
    pub fn object(&self) -> &str {
        &self.object
    }

    /// The quoted, fully qualified form used in serialized plans.
    pub fn as_serializable_string(&self) -> String {
        format!(
            "{}.{}.{}",
            quote_identifier(&self.catalog),
            quote_identifier(&self.database),
            quote_identifier(&self.object)
        )
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_serializable_string())
    }
}

/// Identifier as written by a user, with one to three parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnresolvedIdentifier {
    parts: Vec<String>,
}

impl UnresolvedIdentifier {
    /// Create from parts; `None` unless there are one to three parts.
    pub fn from_parts(parts: Vec<String>) -> Option<Self> {
        (1..=3).contains(&parts.len()).then_some(Self { parts })
    }

    /// The raw parts.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Qualify missing parts with the given current catalog and database.
    pub fn qualify(&self, current_catalog: &str, current_database: &str) -> ObjectIdentifier {
        match self.parts.as_slice() {
            [object] => ObjectIdentifier::new(current_catalog, current_database, object.as_str()),
            [database, object] => {
                ObjectIdentifier::new(current_catalog, database.as_str(), object.as_str())
            }
            [catalog, database, object, ..] => {
                ObjectIdentifier::new(catalog.as_str(), database.as_str(), object.as_str())
            }
            // `from_parts` guarantees at least one part.
            [] => ObjectIdentifier::new(current_catalog, current_database, ""),
        }
    }
}

impl fmt::Display for UnresolvedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<_> = self.parts.iter().map(|p| quote_identifier(p)).collect();
        f.write_str(&quoted.join("."))
    }
}

/// Quote an identifier part with backticks.
pub fn quote_identifier(part: &str) -> String {
    format!("`{}`", part.replace('`', "``"))
}
