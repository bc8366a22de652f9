//! Expression tests: literals, input references and function calls.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;

use crate::codec::{to_document, to_object, DeserializationError, SerializationError};
use crate::error::ReferenceKind;
use crate::plan::{Expr, FunctionRef, Literal, LiteralValue};
use crate::types::LogicalType;

use super::common::{assert_roundtrip, TestEnv, CATALOG, DATABASE};

fn timestamp(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").unwrap()
}

// =============================================================================
// Literals
// =============================================================================

#[test]
fn literal_of_every_kind() {
    let env = TestEnv::new();
    let cases = [
        (LiteralValue::Boolean(true), LogicalType::boolean().not_null(), json!(true)),
        (LiteralValue::Integer(-7), LogicalType::tinyint(), json!(-7)),
        (LiteralValue::Integer(i64::MAX), LogicalType::bigint(), json!(i64::MAX)),
        (LiteralValue::Double(1.5), LogicalType::float(), json!(1.5)),
        (LiteralValue::Double(0.1), LogicalType::double(), json!(0.1)),
        (LiteralValue::String("héllo".into()), LogicalType::varchar(5), json!("héllo")),
        (LiteralValue::String("ab".into()), LogicalType::char(2), json!("ab")),
        (
            LiteralValue::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
            LogicalType::date(),
            json!("2024-02-29"),
        ),
        (
            LiteralValue::Timestamp(timestamp("2024-01-01T12:30:45.123")),
            LogicalType::timestamp(3),
            json!("2024-01-01T12:30:45.123"),
        ),
        (
            LiteralValue::Timestamp(timestamp("2024-01-01T00:00:00")),
            LogicalType::timestamp(0),
            json!("2024-01-01T00:00:00"),
        ),
    ];

    for (value, ty, expected) in cases {
        let literal = Literal::new(value, ty);
        let doc = assert_roundtrip(&env, &literal);
        assert_eq!(doc.at(["kind"]), Some(&json!("LITERAL")));
        assert_eq!(doc.at(["value"]), Some(&expected), "{literal:?}");
    }
}

#[test]
fn null_literal_omits_value() {
    let env = TestEnv::new();
    let doc = assert_roundtrip(&env, &Literal::null(LogicalType::date()));
    doc.assert_does_not_contain(["value"]);
    assert_eq!(doc.at(["type"]), Some(&json!("DATE")));
}

#[test]
fn literal_not_of_its_type() {
    let env = TestEnv::new();
    let cases = [
        Literal::null(LogicalType::int().not_null()),
        Literal::new(LiteralValue::Integer(300), LogicalType::tinyint()),
        Literal::new(LiteralValue::Integer(1), LogicalType::double()),
        Literal::new(LiteralValue::Double(0.1), LogicalType::float()),
        Literal::new(LiteralValue::Double(f64::NAN), LogicalType::double()),
        Literal::new(LiteralValue::String("abcd".into()), LogicalType::varchar(3)),
        Literal::new(LiteralValue::Boolean(false), LogicalType::varchar(3)),
        Literal::new(
            LiteralValue::Timestamp(timestamp("2024-01-01T12:30:45.123456")),
            LogicalType::timestamp(3),
        ),
    ];

    for literal in cases {
        let err = to_document(env.ctx(), &literal).unwrap_err();
        assert!(
            matches!(err, SerializationError::Unsupported { what: "literal", .. }),
            "{literal:?}: {err}"
        );
    }
}

#[test]
fn literal_read_errors() {
    let env = TestEnv::new();
    let cases = [
        (r#"{"kind": "LITERAL", "type": "INT NOT NULL"}"#, ""),
        (r#"{"kind": "LITERAL", "value": 128, "type": "TINYINT"}"#, "/value"),
        (r#"{"kind": "LITERAL", "value": "12", "type": "INT"}"#, "/value"),
        (r#"{"kind": "LITERAL", "value": "2024-13-01", "type": "DATE"}"#, "/value"),
        (r#"{"kind": "LITERAL", "value": "abcd", "type": "CHAR(3)"}"#, "/value"),
        (r#"{"kind": "LITERAL", "value": 1}"#, ""),
    ];

    for (json, pointer) in cases {
        let err = to_object::<Expr>(env.ctx(), json).unwrap_err();
        assert_eq!(err.pointer(), Some(pointer), "{json}: {err}");
    }
}

// =============================================================================
// Function references
// =============================================================================

#[test]
fn builtin_call() {
    let env = TestEnv::new();
    let expr = Expr::call(
        FunctionRef::builtin(env.ctx(), "$=$1").unwrap(),
        vec![
            Expr::input_ref(0, LogicalType::bigint().not_null()),
            Expr::literal(LiteralValue::Integer(42), LogicalType::bigint().not_null()),
        ],
        LogicalType::boolean().not_null(),
    );

    let doc = assert_roundtrip(&env, &expr);
    assert_eq!(doc.at(["kind"]), Some(&json!("CALL")));
    assert_eq!(doc.at(["internalName"]), Some(&json!("$=$1")));
    assert_eq!(doc.at(["operands", "0", "inputIndex"]), Some(&json!(0)));
    assert_eq!(doc.at(["operands", "1", "value"]), Some(&json!(42)));
    doc.assert_does_not_contain(["systemName"]);
    doc.assert_does_not_contain(["catalogName"]);
}

#[test]
fn temporary_system_call() {
    let env = TestEnv::new();
    let expr = Expr::call(
        FunctionRef::TemporarySystem("my_udf".into()),
        vec![Expr::input_ref(2, LogicalType::varchar(100))],
        LogicalType::int(),
    );
    let doc = assert_roundtrip(&env, &expr);
    assert_eq!(doc.at(["systemName"]), Some(&json!("my_udf")));
}

#[test]
fn catalog_function_call() {
    let env = TestEnv::new();
    let identifier = crate::catalog::ObjectIdentifier::new(CATALOG, DATABASE, "my_fn");
    let expr = Expr::call(FunctionRef::Catalog(identifier), Vec::new(), LogicalType::string());
    let doc = assert_roundtrip(&env, &expr);
    assert_eq!(doc.at(["catalogName"]), Some(&json!("`cat`.`db`.`my_fn`")));
    assert_eq!(doc.at(["operands"]), Some(&json!([])));
}

#[test]
fn nested_calls_resolve_at_every_level() {
    let env = TestEnv::new();
    let upper = FunctionRef::builtin(env.ctx(), "$UPPER$1").unwrap();
    let expr = Expr::call(
        FunctionRef::builtin(env.ctx(), "$IS NOT NULL$1").unwrap(),
        vec![Expr::call(
            upper,
            vec![Expr::call(
                FunctionRef::TemporarySystem("my_udf".into()),
                vec![Expr::input_ref(2, LogicalType::varchar(100))],
                LogicalType::varchar(100),
            )],
            LogicalType::varchar(100),
        )],
        LogicalType::boolean().not_null(),
    );

    let doc = assert_roundtrip(&env, &expr);
    assert_eq!(
        doc.at(["operands", "0", "operands", "0", "systemName"]),
        Some(&json!("my_udf"))
    );
}

#[test]
fn unknown_builtin_on_read() {
    let env = TestEnv::new();
    let json = r#"{"kind": "CALL", "internalName": "$NOPE$1", "operands": [], "type": "INT"}"#;
    let err = to_object::<Expr>(env.ctx(), json).unwrap_err();
    assert_eq!(
        err,
        DeserializationError::UnresolvedReference {
            expected: "function reference",
            kind: ReferenceKind::Function,
            name: "$NOPE$1".to_string(),
            pointer: "/internalName".to_string(),
        }
    );
}

#[test]
fn call_without_function_name() {
    let env = TestEnv::new();
    let json = r#"{"kind": "CALL", "operands": [], "type": "INT"}"#;
    let err = to_object::<Expr>(env.ctx(), json).unwrap_err();
    assert!(matches!(err, DeserializationError::InvalidValue { .. }), "{err}");
}

#[test]
fn unknown_expression_kind() {
    let env = TestEnv::new();
    let err = to_object::<Expr>(env.ctx(), r#"{"kind": "OVER", "type": "INT"}"#).unwrap_err();
    assert_eq!(err.pointer(), Some("/kind"));

    let err = to_object::<Expr>(env.ctx(), r#"{"type": "INT"}"#).unwrap_err();
    assert!(matches!(err, DeserializationError::MissingField { .. }));
}

#[test]
fn input_ref_types_use_catalog_types() {
    let env = TestEnv::new();
    let expr = Expr::input_ref(1, super::common::money());
    let doc = assert_roundtrip(&env, &expr);
    assert_eq!(doc.at(["type"]), Some(&json!("`cat`.`db`.`money`")));

    let expr = Expr::input_ref(3, super::common::point().not_null());
    let doc = assert_roundtrip(&env, &expr);
    assert_eq!(doc.at(["type"]), Some(&json!("EXTENSION('geo.Point') NOT NULL")));
}
