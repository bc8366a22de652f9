//! Reference resolution tests: what a context does not know must fail.

use std::sync::Arc;

use crate::catalog::{CatalogTable, Column, InMemoryCatalog, ObjectIdentifier};
use crate::codec::{
    to_document, to_object, try_round_trip, DeserializationError, SerializationError,
};
use crate::context::{configured_serde_context, SerdeContext};
use crate::error::{HarnessError, ReferenceKind};
use crate::function::BuiltinFunction;
use crate::function::FunctionKind;
use crate::plan::{Expr, FunctionRef, ResolvedTable, TableSourceSpec};
use crate::types::{ExtensionType, LogicalType, TypeFactory};

use super::common::{
    assert_roundtrip, money, orders_id, orders_table, point, TestEnv, CATALOG, DATABASE,
};

fn unresolved(err: SerializationError) -> (ReferenceKind, String) {
    match err {
        SerializationError::UnresolvedReference { kind, name } => (kind, name),
        other => panic!("expected an unresolved reference, got: {other}"),
    }
}

#[test]
fn unknown_table_fails_on_write() {
    let ctx = configured_serde_context();
    let table = ResolvedTable::permanent(orders_id(), orders_table());
    let (kind, name) = unresolved(to_document(&ctx, &table).unwrap_err());
    assert_eq!(kind, ReferenceKind::Table);
    assert_eq!(name, "`cat`.`db`.`orders`");
}

#[test]
fn unknown_distinct_type_fails_on_write() {
    let ctx = configured_serde_context();
    let expr = Expr::input_ref(0, money());
    let (kind, name) = unresolved(to_document(&ctx, &expr).unwrap_err());
    assert_eq!(kind, ReferenceKind::Type);
    assert_eq!(name, "`cat`.`db`.`money`");
}

#[test]
fn distinct_type_with_other_source_fails_on_write() {
    let env = TestEnv::new();
    let impostor = LogicalType::distinct(
        ObjectIdentifier::new(CATALOG, DATABASE, "money"),
        LogicalType::decimal(10, 0),
    );
    let (kind, _) = unresolved(to_document(env.ctx(), &Expr::input_ref(0, impostor)).unwrap_err());
    assert_eq!(kind, ReferenceKind::Type);
}

#[test]
fn unknown_extension_fails_on_write() {
    let ctx = configured_serde_context();
    let expr = Expr::input_ref(0, LogicalType::array(point()));
    let (kind, name) = unresolved(to_document(&ctx, &expr).unwrap_err());
    assert_eq!(kind, ReferenceKind::ExtensionClass);
    assert_eq!(name, "geo.Point");

    // Same class name, different definition.
    let env = TestEnv::new();
    let other = LogicalType::extension(Arc::new(ExtensionType::new("geo.Point", "3D point")));
    let (kind, _) = unresolved(to_document(env.ctx(), &Expr::input_ref(0, other)).unwrap_err());
    assert_eq!(kind, ReferenceKind::ExtensionClass);
}

#[test]
fn unknown_functions_fail_on_write() {
    let ctx = configured_serde_context();
    let cases = [
        FunctionRef::Builtin(BuiltinFunction::new("MY_BUILTIN", 1, FunctionKind::Scalar)),
        FunctionRef::Builtin(BuiltinFunction::new("UPPER", 2, FunctionKind::Scalar)),
        FunctionRef::TemporarySystem("my_udf".into()),
        FunctionRef::Catalog(ObjectIdentifier::new(CATALOG, DATABASE, "my_fn")),
    ];

    for function in cases {
        let expr = Expr::call(function, Vec::new(), LogicalType::int());
        let (kind, _) = unresolved(to_document(&ctx, &expr).unwrap_err());
        assert_eq!(kind, ReferenceKind::Function);
    }
}

#[test]
fn unreadable_types_fail_on_write() {
    let env = TestEnv::new();
    let deepest = (1..env.ctx().parser().max_depth())
        .fold(LogicalType::bigint(), |element, _| LogicalType::array(element));
    assert_roundtrip(&env, &Expr::input_ref(0, deepest.clone()));

    let cases = [
        LogicalType::decimal(50, 2),
        LogicalType::decimal(5, 6),
        LogicalType::varchar(0),
        LogicalType::timestamp(12),
        LogicalType::array(deepest),
    ];
    for ty in cases {
        let expr = Expr::input_ref(0, ty);
        let err = to_document(env.ctx(), &expr).unwrap_err();
        assert!(matches!(err, SerializationError::Unsupported { what: "type", .. }), "{err}");
    }
}

#[test]
fn reference_nested_in_source_fails_on_write() {
    let env = TestEnv::new();
    let spec = TableSourceSpec::new(env.orders()).with_filter(Expr::call(
        FunctionRef::TemporarySystem("unregistered".into()),
        Vec::new(),
        LogicalType::boolean(),
    ));
    let err = try_round_trip(env.ctx(), &spec).unwrap_err();
    assert!(matches!(err, HarnessError::Serialization(_)));
    assert!(!err.is_assertion());
}

#[test]
fn reading_against_a_context_without_the_references() {
    let env = TestEnv::new();
    let empty = configured_serde_context();

    let udf = Expr::call(
        FunctionRef::TemporarySystem("my_udf".into()),
        Vec::new(),
        LogicalType::int(),
    );
    let json = to_document(env.ctx(), &udf).unwrap().into_text();
    let err = to_object::<Expr>(&empty, &json).unwrap_err();
    assert_eq!(err.pointer(), Some("/systemName"));

    let typed = Expr::input_ref(0, point());
    let json = to_document(env.ctx(), &typed).unwrap().into_text();
    let err = to_object::<Expr>(&empty, &json).unwrap_err();
    assert!(matches!(
        err,
        DeserializationError::UnresolvedReference {
            kind: ReferenceKind::ExtensionClass,
            ..
        }
    ));
    assert_eq!(err.pointer(), Some("/type"));

    let json = to_document(env.ctx(), &env.orders()).unwrap().into_text();
    assert!(to_object::<ResolvedTable>(&empty, &json).is_err());
}

#[test]
fn resolution_is_deterministic() {
    let factory = Arc::new(TypeFactory::new());
    let ctx = SerdeContext::builder()
        .with_catalog(Arc::new(
            InMemoryCatalog::new(CATALOG, DATABASE).with_type("money", LogicalType::decimal(12, 2)),
        ))
        .with_type_factory(Arc::clone(&factory))
        .build()
        .unwrap();

    let first = ctx.resolve_type("ARRAY<`cat`.`db`.`money`>").unwrap();
    let second = ctx.resolve_type("ARRAY<money>").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(factory.len(), 1);

    let table = ResolvedTable::anonymous(CatalogTable::new([
        Column::new("a", Arc::clone(&first)),
        Column::new("b", money()),
    ]));
    let json = to_document(&ctx, &table).unwrap().into_text();
    let one: ResolvedTable = to_object(&ctx, &json).unwrap();
    let two: ResolvedTable = to_object(&ctx, &json).unwrap();
    assert_eq!(one, two);
    assert!(Arc::ptr_eq(
        one.table().columns()[0].data_type(),
        two.table().columns()[0].data_type()
    ));
}
