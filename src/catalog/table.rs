//! Catalog tables.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::LogicalType;

/// A physical column of a table schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    data_type: Arc<LogicalType>,
}

impl Column {
    /// Create a new column.
    pub fn new(name: impl Into<String>, data_type: impl Into<Arc<LogicalType>>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column type.
    pub fn data_type(&self) -> &Arc<LogicalType> {
        &self.data_type
    }
}

/// A table as stored in a catalog: schema, partitioning, connector options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogTable {
    columns: Vec<Column>,
    partition_keys: Vec<String>,
    options: BTreeMap<String, String>,
    comment: Option<String>,
}

impl CatalogTable {
    /// Create a table with the given columns.
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Add a connector option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Set the partition keys.
    pub fn with_partition_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partition_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the table comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Schema columns, in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Partition keys.
    pub fn partition_keys(&self) -> &[String] {
        &self.partition_keys
    }

    /// Connector options.
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// Table comment.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}
