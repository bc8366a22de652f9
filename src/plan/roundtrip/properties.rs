//! Property-based roundtrip tests.

use std::time::Duration;

use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::subsequence;

use crate::codec::try_stable_round_trip;
use crate::document::{JsonPath, PathSegment};
use crate::plan::{ChangelogMode, Literal, LiteralValue, RowKind, TableSourceSpec};
use crate::types::LogicalType;

use super::common::{assert_roundtrip, TestEnv};

// =============================================================================
// Strategies
// =============================================================================

fn arb_changelog_mode() -> impl Strategy<Value = ChangelogMode> {
    let kinds = vec![RowKind::Insert, RowKind::UpdateBefore, RowKind::UpdateAfter, RowKind::Delete];
    subsequence(kinds, 1..=4).prop_map(ChangelogMode::from_kinds)
}

type SourceMembers = (Option<Vec<u32>>, Option<u64>, Option<u64>, ChangelogMode);

fn arb_source_members() -> impl Strategy<Value = SourceMembers> {
    (
        proptest::option::of(vec(0u32..4, 0..4)),
        proptest::option::of(any::<u64>()),
        proptest::option::of(0u64..100_000),
        arb_changelog_mode(),
    )
}

fn arb_segment() -> impl Strategy<Value = PathSegment> {
    prop_oneof![
        "[a-zA-Z~/_]{1,6}".prop_map(PathSegment::Field),
        (0usize..1000).prop_map(PathSegment::Index),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn source_members_present_iff_set((projection, limit, timeout, mode) in arb_source_members()) {
        let env = TestEnv::new();
        let mut spec = TableSourceSpec::new(env.orders()).with_changelog_mode(mode.clone());
        if let Some(columns) = projection.clone() {
            spec = spec.with_projection(columns);
        }
        if let Some(limit) = limit {
            spec = spec.with_limit(limit);
        }
        if let Some(secs) = timeout {
            spec = spec.with_timeout(Duration::from_secs(secs));
        }

        let doc = assert_roundtrip(&env, &spec);
        prop_assert_eq!(doc.contains(["projection"]), projection.is_some());
        prop_assert_eq!(doc.contains(["limit"]), limit.is_some());
        prop_assert_eq!(doc.contains(["timeout"]), timeout.is_some());
        prop_assert_eq!(doc.contains(["changelogMode"]), !mode.is_insert_only());
        prop_assert!(!doc.contains(["filters"]));
    }

    #[test]
    fn bigint_literals(value in any::<i64>()) {
        let env = TestEnv::new();
        let literal = Literal::new(LiteralValue::Integer(value), LogicalType::bigint().not_null());
        prop_assert_eq!(try_stable_round_trip(env.ctx(), &literal).unwrap(), literal);
    }

    #[test]
    fn double_literals(value in any::<f64>().prop_filter("finite", |d| d.is_finite())) {
        let env = TestEnv::new();
        let literal = Literal::new(LiteralValue::Double(value), LogicalType::double());
        prop_assert_eq!(try_stable_round_trip(env.ctx(), &literal).unwrap(), literal);
    }

    #[test]
    fn varchar_literals(value in ".{0,20}") {
        let env = TestEnv::new();
        let literal = Literal::new(LiteralValue::String(value), LogicalType::varchar(20));
        prop_assert_eq!(try_stable_round_trip(env.ctx(), &literal).unwrap(), literal);
    }

    #[test]
    fn pointer_parse_inverts_to_pointer(segments in vec(arb_segment(), 0..6)) {
        let path = JsonPath::from_segments(segments);
        prop_assert_eq!(JsonPath::parse(&path.to_pointer()).unwrap(), path);
    }
}
