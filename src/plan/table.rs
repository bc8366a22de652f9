//! Tables referenced by a plan.
//!
//! A permanent table is written as its identifier, plus the resolved table
//! unless `table.plan.compile.catalog-objects` is `IDENTIFIER`. On read,
//! `table.plan.restore.catalog-objects` decides whether the inlined table or
//! the catalog wins. Anonymous tables have no identifier and are always
//! inlined.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::catalog::{CatalogTable, Column, ObjectIdentifier};
use crate::codec::{
    require_table, DeserializationError, JsonDeserialize, JsonSerialize, Node, ObjectBuilder,
    SerializationError,
};
use crate::config::{CatalogPlanCompilation, CatalogPlanRestore};
use crate::context::SerdeContext;
use crate::error::ReferenceKind;
use crate::types::LogicalType;

const IDENTIFIER: &str = "identifier";
const RESOLVED_TABLE: &str = "resolvedTable";

/// A table together with how it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTable {
    identifier: Option<ObjectIdentifier>,
    table: Arc<CatalogTable>,
}

impl ResolvedTable {
    /// A table registered in a catalog under `identifier`.
    pub fn permanent(identifier: ObjectIdentifier, table: impl Into<Arc<CatalogTable>>) -> Self {
        Self {
            identifier: Some(identifier),
            table: table.into(),
        }
    }

    /// An inline table with no catalog entry.
    pub fn anonymous(table: impl Into<Arc<CatalogTable>>) -> Self {
        Self {
            identifier: None,
            table: table.into(),
        }
    }

    /// Resolve `identifier` through the context's catalog.
    pub fn lookup(ctx: &SerdeContext, identifier: &ObjectIdentifier) -> Option<Self> {
        let table = ctx.environment().lookup_table(identifier)?;
        Some(Self::permanent(identifier.clone(), table))
    }

    /// The catalog identifier; `None` for anonymous tables.
    pub fn identifier(&self) -> Option<&ObjectIdentifier> {
        self.identifier.as_ref()
    }

    /// The resolved table.
    pub fn table(&self) -> &Arc<CatalogTable> {
        &self.table
    }

    /// Whether the table has no catalog entry.
    pub fn is_anonymous(&self) -> bool {
        self.identifier.is_none()
    }
}

impl JsonSerialize for ResolvedTable {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        let Some(identifier) = &self.identifier else {
            return Ok(ObjectBuilder::new(ctx)
                .field(RESOLVED_TABLE, self.table.as_ref())?
                .build());
        };

        require_table(ctx, identifier)?;
        let builder = ObjectBuilder::new(ctx).field(IDENTIFIER, identifier)?;
        let builder = match ctx.table_config().catalog_plan_compilation() {
            CatalogPlanCompilation::All => builder.field(RESOLVED_TABLE, self.table.as_ref())?,
            CatalogPlanCompilation::Identifier => builder,
        };
        Ok(builder.build())
    }
}

impl JsonDeserialize for ResolvedTable {
    const EXPECTED: &'static str = "resolved table";

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let obj = node.object(Self::EXPECTED)?;
        let Some(identifier) = obj.optional::<ObjectIdentifier>(ctx, IDENTIFIER)? else {
            let table: CatalogTable = obj.required(ctx, RESOLVED_TABLE)?;
            return Ok(Self::anonymous(table));
        };

        let restore = ctx.table_config().catalog_plan_restore();
        let inline = match restore {
            CatalogPlanRestore::Identifier => None,
            CatalogPlanRestore::All => obj.optional::<CatalogTable>(ctx, RESOLVED_TABLE)?,
            CatalogPlanRestore::AllEnforced => {
                Some(obj.required::<CatalogTable>(ctx, RESOLVED_TABLE)?)
            }
        };
        trace!(
            %identifier,
            restore = restore.as_str(),
            inline = inline.is_some(),
            "restoring table"
        );

        match inline {
            Some(table) => Ok(Self::permanent(identifier, table)),
            None => Self::lookup(ctx, &identifier).ok_or_else(|| {
                let at = obj.get(IDENTIFIER).unwrap_or_else(|| obj.node().clone());
                at.unresolved(
                    Self::EXPECTED,
                    ReferenceKind::Table,
                    identifier.as_serializable_string(),
                )
            }),
        }
    }
}

// =============================================================================
// Catalog table encoding
// =============================================================================

impl JsonSerialize for Column {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        Ok(ObjectBuilder::new(ctx)
            .field("name", self.name())?
            .field("dataType", self.data_type())?
            .build())
    }
}

impl JsonDeserialize for Column {
    const EXPECTED: &'static str = "column";

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let obj = node.object(Self::EXPECTED)?;
        let name = obj.str("name")?;
        let data_type: Arc<LogicalType> = obj.required(ctx, "dataType")?;
        Ok(Column::new(name, data_type))
    }
}

impl JsonSerialize for CatalogTable {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        let options: serde_json::Map<String, Value> = self
            .options()
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Ok(ObjectBuilder::new(ctx)
            .field("columns", self.columns())?
            .field_nonempty("partitionKeys", self.partition_keys())?
            .field_raw("options", Value::Object(options))
            .field_opt("comment", self.comment())?
            .build())
    }
}

impl JsonDeserialize for CatalogTable {
    const EXPECTED: &'static str = "catalog table";

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let obj = node.object(Self::EXPECTED)?;
        let columns: Vec<Column> = obj.required(ctx, "columns")?;
        let partition_keys: Vec<String> = obj.list_or_empty(ctx, "partitionKeys")?;
        let mut options = BTreeMap::new();
        if let Some(node) = obj.get("options") {
            let members = node.object(Self::EXPECTED)?;
            for (key, value) in members.entries() {
                options.insert(key.to_string(), value.as_str("option value")?.to_string());
            }
        }
        let comment: Option<String> = obj.optional(ctx, "comment")?;

        let mut table = CatalogTable::new(columns).with_partition_keys(partition_keys);
        for (key, value) in options {
            table = table.with_option(key, value);
        }
        if let Some(comment) = comment {
            table = table.with_comment(comment);
        }
        Ok(table)
    }
}
