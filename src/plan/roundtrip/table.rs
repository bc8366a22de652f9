//! Catalog table tests: compile and restore modes.

use std::sync::Arc;

use serde_json::json;

use crate::catalog::{CatalogTable, Column, InMemoryCatalog};
use crate::codec::{to_document, to_object, DeserializationError};
use crate::config::{CatalogPlanCompilation, CatalogPlanRestore, ConfigBuilder, ConfigurationError};
use crate::context::SerdeContext;
use crate::error::ReferenceKind;
use crate::plan::ResolvedTable;
use crate::types::LogicalType;

use super::common::{
    assert_roundtrip, orders_id, orders_table, populated_catalog, TestEnv, CATALOG, DATABASE,
};

fn env(compilation: CatalogPlanCompilation, restore: CatalogPlanRestore) -> TestEnv {
    TestEnv::with_configuration(
        ConfigBuilder::new()
            .catalog_plan_compilation(compilation)
            .catalog_plan_restore(restore)
            .build(),
    )
}

/// The orders table as written under `ALL`, with its comment replaced.
fn inline_with_comment(env: &TestEnv, comment: &str) -> String {
    let mut tree = to_document(env.ctx(), &env.orders()).unwrap().tree().clone();
    tree["resolvedTable"]["comment"] = json!(comment);
    tree.to_string()
}

#[test]
fn compile_all_inlines_table() {
    let env = TestEnv::new();
    let doc = assert_roundtrip(&env, &env.orders());

    assert_eq!(doc.at(["identifier"]), Some(&json!("`cat`.`db`.`orders`")));
    doc.assert_contains(["resolvedTable", "columns"]);
    doc.assert_contains(["resolvedTable", "options", "connector"]);
    assert_eq!(doc.at(["resolvedTable", "partitionKeys", "0"]), Some(&json!("id")));
    assert_eq!(
        doc.at(["resolvedTable", "columns", "1", "dataType"]),
        Some(&json!("`cat`.`db`.`money`"))
    );
}

#[test]
fn compile_identifier_writes_identifier_only() {
    let env = env(CatalogPlanCompilation::Identifier, CatalogPlanRestore::All);
    let doc = assert_roundtrip(&env, &env.orders());

    doc.assert_contains(["identifier"]);
    doc.assert_does_not_contain(["resolvedTable"]);
}

#[test]
fn restore_all_prefers_inlined_table() {
    let env = TestEnv::new();
    let json = inline_with_comment(&env, "from the plan");

    let restored: ResolvedTable = to_object(env.ctx(), &json).unwrap();
    assert_eq!(restored.identifier(), Some(&orders_id()));
    assert_eq!(restored.table().comment(), Some("from the plan"));
}

#[test]
fn restore_identifier_ignores_inlined_table() {
    let env = env(CatalogPlanCompilation::All, CatalogPlanRestore::Identifier);
    let json = inline_with_comment(&env, "from the plan");

    let restored: ResolvedTable = to_object(env.ctx(), &json).unwrap();
    assert_eq!(restored, env.orders());
    assert_eq!(restored.table().comment(), Some("all orders"));
}

#[test]
fn restore_identifier_skips_unreadable_inline() {
    let env = env(CatalogPlanCompilation::All, CatalogPlanRestore::Identifier);
    let json = r#"{"identifier": "`cat`.`db`.`orders`", "resolvedTable": {"columns": "garbage"}}"#;

    let restored: ResolvedTable = to_object(env.ctx(), json).unwrap();
    assert_eq!(restored, env.orders());
}

#[test]
fn restore_all_enforced_requires_inlined_table() {
    let env = env(CatalogPlanCompilation::All, CatalogPlanRestore::AllEnforced);
    assert_roundtrip(&env, &env.orders());

    let json = r#"{"identifier": "`cat`.`db`.`orders`"}"#;
    let err = to_object::<ResolvedTable>(env.ctx(), json).unwrap_err();
    assert_eq!(
        err,
        DeserializationError::MissingField {
            expected: "resolved table",
            field: "resolvedTable".to_string(),
            pointer: String::new(),
        }
    );
}

#[test]
fn identifier_compilation_conflicts_with_enforced_restore() {
    let result = SerdeContext::builder()
        .with_configuration(
            ConfigBuilder::new()
                .catalog_plan_compilation(CatalogPlanCompilation::Identifier)
                .catalog_plan_restore(CatalogPlanRestore::AllEnforced)
                .build(),
        )
        .build();
    assert!(matches!(result, Err(ConfigurationError::Conflict { .. })));
}

#[test]
fn partial_identifier_is_qualified() {
    let env = TestEnv::new();
    let restored: ResolvedTable = to_object(env.ctx(), r#"{"identifier": "orders"}"#).unwrap();
    assert_eq!(restored, env.orders());
}

#[test]
fn unknown_table_on_restore() {
    let env = env(CatalogPlanCompilation::All, CatalogPlanRestore::Identifier);
    let json = r#"{"identifier": "`cat`.`db`.`missing`"}"#;
    let err = to_object::<ResolvedTable>(env.ctx(), json).unwrap_err();

    match err {
        DeserializationError::UnresolvedReference {
            kind, name, pointer, ..
        } => {
            assert_eq!(kind, ReferenceKind::Table);
            assert_eq!(name, "`cat`.`db`.`missing`");
            assert_eq!(pointer, "/identifier");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn anonymous_table_is_always_inlined() {
    for compilation in [CatalogPlanCompilation::All, CatalogPlanCompilation::Identifier] {
        let env = env(compilation, CatalogPlanRestore::Identifier);
        let table = ResolvedTable::anonymous(CatalogTable::new([
            Column::new("a", LogicalType::int()),
            Column::new("b", LogicalType::array(LogicalType::varchar(8))),
        ]));

        let doc = assert_roundtrip(&env, &table);
        doc.assert_does_not_contain(["identifier"]);
        doc.assert_contains(["resolvedTable", "columns", "1", "dataType"]);
        doc.assert_does_not_contain(["resolvedTable", "partitionKeys"]);
        doc.assert_does_not_contain(["resolvedTable", "comment"]);
        assert_eq!(doc.at(["resolvedTable", "options"]), Some(&json!({})));
    }
}

#[test]
fn table_in_second_catalog() {
    let other = crate::catalog::ObjectIdentifier::new("other", "db", "events");
    let catalog = populated_catalog().with_table_at(
        other.clone(),
        CatalogTable::new([Column::new("ts", LogicalType::timestamp(3))]),
    );
    let ctx = SerdeContext::builder()
        .with_catalog(Arc::new(catalog))
        .build()
        .unwrap();

    let table = ResolvedTable::lookup(&ctx, &other).unwrap();
    let doc = to_document(&ctx, &table).unwrap();
    assert_eq!(doc.at(["identifier"]), Some(&json!("`other`.`db`.`events`")));
    assert_eq!(to_object::<ResolvedTable>(&ctx, doc.text()).unwrap(), table);
}

#[test]
fn inline_table_with_unknown_type_fails_under_all() {
    // Same table, but the reading side never registered `money`.
    let writer = TestEnv::new();
    let json = to_document(writer.ctx(), &writer.orders()).unwrap().into_text();

    let reader = SerdeContext::builder()
        .with_catalog(Arc::new(
            InMemoryCatalog::new(CATALOG, DATABASE).with_table("orders", orders_table()),
        ))
        .build()
        .unwrap();
    let err = to_object::<ResolvedTable>(&reader, &json).unwrap_err();
    assert!(matches!(
        err,
        DeserializationError::UnresolvedReference {
            kind: ReferenceKind::Type,
            ..
        }
    ));
    assert_eq!(err.pointer(), Some("/resolvedTable/columns/1/dataType"));
}
