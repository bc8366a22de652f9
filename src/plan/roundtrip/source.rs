//! Table source spec tests: omission of optional members.

use std::time::Duration;

use crate::catalog::{CatalogTable, Column};
use crate::codec::{assert_json_round_trip, to_document, to_object, SerializationError};
use crate::context::configured_serde_context;
use crate::document::{assert_json_contains, assert_json_does_not_contain, JsonPath};
use crate::plan::{
    ChangelogMode, Expr, FunctionRef, LiteralValue, ResolvedTable, RowKind, TableSourceSpec,
};
use crate::types::LogicalType;

use super::common::{assert_roundtrip, TestEnv};

#[test_log::test]
fn timeout_unset_then_set() {
    let ctx = configured_serde_context();
    let table = CatalogTable::new([Column::new("id", LogicalType::bigint().not_null())]);
    let spec = TableSourceSpec::new(ResolvedTable::anonymous(table));

    let restored = assert_json_round_trip(&ctx, &spec);
    assert_eq!(restored, spec);
    let doc = to_document(&ctx, &spec).unwrap();
    assert_json_does_not_contain(doc.tree(), ["timeout"]);

    let spec = spec.with_timeout(Duration::from_secs(30));
    assert_eq!(assert_json_round_trip(&ctx, &spec), spec);
    let doc = to_document(&ctx, &spec).unwrap();
    assert_json_contains(doc.tree(), ["timeout"]);
    assert_eq!(doc.at(["timeout"]), Some(&serde_json::json!(30)));
}

#[test]
fn defaults_are_omitted() {
    let env = TestEnv::new();
    let doc = assert_roundtrip(&env, &TableSourceSpec::new(env.orders()));

    doc.assert_contains(["table"]);
    for member in ["projection", "filters", "limit", "timeout", "changelogMode"] {
        doc.assert_does_not_contain([member]);
    }
}

#[test]
fn set_members_are_present() {
    let env = TestEnv::new();
    let filter = Expr::call(
        FunctionRef::builtin(env.ctx(), "$IS NOT NULL$1").unwrap(),
        vec![Expr::input_ref(2, LogicalType::varchar(100))],
        LogicalType::boolean().not_null(),
    );
    let spec = TableSourceSpec::new(env.orders())
        .with_projection([0, 2])
        .with_filter(filter)
        .with_limit(100)
        .with_timeout(Duration::from_secs(5))
        .with_changelog_mode(ChangelogMode::upsert());

    let doc = assert_roundtrip(&env, &spec);
    for member in ["projection", "filters", "limit", "timeout", "changelogMode"] {
        doc.assert_contains([member]);
    }
    doc.assert_contains(JsonPath::from_segments(["filters"]).index(0).field("operands"));
    assert_eq!(
        doc.at(["changelogMode"]),
        Some(&serde_json::json!(["INSERT", "UPDATE_AFTER", "DELETE"]))
    );
}

#[test]
fn empty_projection_is_not_omitted() {
    let env = TestEnv::new();
    let spec = TableSourceSpec::new(env.orders()).with_projection([]);
    let doc = assert_roundtrip(&env, &spec);
    doc.assert_contains(["projection"]);
    assert_eq!(spec.projection(), Some(&[][..]));
}

#[test]
fn explicit_insert_only_equals_default() {
    let env = TestEnv::new();
    let spec = TableSourceSpec::new(env.orders())
        .with_changelog_mode(ChangelogMode::from_kinds([RowKind::Insert]));
    let doc = assert_roundtrip(&env, &spec);
    doc.assert_does_not_contain(["changelogMode"]);
}

#[test]
fn sub_second_timeout_is_rejected() {
    let env = TestEnv::new();
    let spec = TableSourceSpec::new(env.orders()).with_timeout(Duration::from_millis(1500));
    let err = to_document(env.ctx(), &spec).unwrap_err();
    assert!(matches!(err, SerializationError::Unsupported { what: "timeout", .. }));
}

#[test]
fn null_members_read_as_unset() {
    let env = TestEnv::new();
    let json = r#"{
        "table": {"identifier": "`cat`.`db`.`orders`"},
        "projection": null,
        "limit": null,
        "timeout": null,
        "changelogMode": null
    }"#;
    let spec: TableSourceSpec = to_object(env.ctx(), json).unwrap();
    assert_eq!(spec, TableSourceSpec::new(env.orders()));
}

#[test]
fn bad_changelog_mode() {
    let env = TestEnv::new();
    for mode in [r#"[]"#, r#"["UPSERT"]"#, r#""INSERT""#] {
        let json = format!(
            r#"{{"table": {{"identifier": "`cat`.`db`.`orders`"}}, "changelogMode": {mode}}}"#
        );
        let err = to_object::<TableSourceSpec>(env.ctx(), &json).unwrap_err();
        assert_eq!(err.pointer(), Some("/changelogMode"), "{mode}: {err}");
    }
}

#[test]
fn literal_filter_values() {
    let env = TestEnv::new();
    let spec = TableSourceSpec::new(env.orders())
        .with_filter(Expr::literal(LiteralValue::Boolean(true), LogicalType::boolean()))
        .with_filter(Expr::literal(LiteralValue::Null, LogicalType::boolean()));
    let doc = assert_roundtrip(&env, &spec);
    doc.assert_contains(JsonPath::from_segments(["filters"]).index(0).field("value"));
    doc.assert_does_not_contain(JsonPath::from_segments(["filters"]).index(1).field("value"));
}

#[test]
fn empty_changelog_mode_fails_on_write() {
    let env = TestEnv::new();
    let spec =
        TableSourceSpec::new(env.orders()).with_changelog_mode(ChangelogMode::from_kinds([]));
    let err = to_document(env.ctx(), &spec).unwrap_err();
    assert!(
        matches!(err, SerializationError::Unsupported { what: "changelog mode", .. }),
        "{err}"
    );
}
