//! Test infrastructure for roundtrip tests.

use std::fmt::Debug;
use std::sync::Arc;

use crate::catalog::{CatalogTable, Column, InMemoryCatalog, ObjectIdentifier};
use crate::codec::{to_document, try_stable_round_trip, JsonDeserialize, JsonSerialize};
use crate::config::Configuration;
use crate::context::SerdeContext;
use crate::document::SerializedDocument;
use crate::function::{FunctionDefinition, FunctionKind};
use crate::plan::ResolvedTable;
use crate::types::{ExtensionType, LogicalType};

pub const CATALOG: &str = "cat";
pub const DATABASE: &str = "db";

/// `cat.db.money`, a distinct DECIMAL(12, 2).
pub fn money() -> LogicalType {
    LogicalType::distinct(
        ObjectIdentifier::new(CATALOG, DATABASE, "money"),
        LogicalType::decimal(12, 2),
    )
}

pub fn point_extension() -> ExtensionType {
    ExtensionType::new("geo.Point", "2D point")
}

pub fn point() -> LogicalType {
    LogicalType::extension(Arc::new(point_extension()))
}

pub fn orders_id() -> ObjectIdentifier {
    ObjectIdentifier::new(CATALOG, DATABASE, "orders")
}

pub fn orders_table() -> CatalogTable {
    CatalogTable::new([
        Column::new("id", LogicalType::bigint().not_null()),
        Column::new("amount", money()),
        Column::new("note", LogicalType::varchar(100)),
        Column::new("location", point()),
    ])
    .with_partition_keys(["id"])
    .with_option("connector", "values")
    .with_comment("all orders")
}

/// Catalog with the `orders` table, the `money` type and the `my_fn` function.
pub fn populated_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(CATALOG, DATABASE)
        .with_type("money", LogicalType::decimal(12, 2))
        .with_table("orders", orders_table())
        .with_function("my_fn", FunctionDefinition::new("my_fn", FunctionKind::Scalar))
}

/// Test environment providing a populated context.
pub struct TestEnv {
    ctx: SerdeContext,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_configuration(Configuration::new())
    }

    pub fn with_configuration(configuration: Configuration) -> Self {
        let ctx = SerdeContext::builder()
            .with_catalog(Arc::new(populated_catalog()))
            .with_configuration(configuration)
            .with_extension_type(point_extension())
            .with_temporary_system_function(
                "my_udf",
                FunctionDefinition::new("my_udf", FunctionKind::Scalar),
            )
            .build()
            .unwrap();
        Self { ctx }
    }

    pub fn ctx(&self) -> &SerdeContext {
        &self.ctx
    }

    pub fn orders(&self) -> ResolvedTable {
        ResolvedTable::lookup(&self.ctx, &orders_id()).unwrap()
    }
}

/// Test value → JSON → value roundtrip and return the serialized document.
pub fn assert_roundtrip<T>(env: &TestEnv, value: &T) -> SerializedDocument
where
    T: JsonSerialize + JsonDeserialize + PartialEq + Debug,
{
    if let Err(e) = try_stable_round_trip(env.ctx(), value) {
        panic!("roundtrip failed: {e}");
    }
    to_document(env.ctx(), value).unwrap()
}
