//! Round-trip checks: serialize, read back, compare.
//!
//! Nothing is cached between calls; every check resolves against the
//! context from scratch.

use std::fmt::Debug;

use tracing::debug;

use super::deserialize::{to_object, JsonDeserialize};
use super::serialize::{to_json, JsonSerialize};
use crate::context::{configured_serde_context, SerdeContext};
use crate::document::AssertionFailure;
use crate::error::HarnessError;

/// Serialize `value`, read it back, and check the result equals `value`.
///
/// Returns the restored value.
pub fn try_round_trip<T>(ctx: &SerdeContext, value: &T) -> Result<T, HarnessError>
where
    T: JsonSerialize + JsonDeserialize + PartialEq + Debug,
{
    let json = to_json(ctx, value)?;
    debug!(expected = T::EXPECTED, %json, "round trip");
    let restored = to_object::<T>(ctx, &json)?;
    if restored != *value {
        return Err(AssertionFailure::RoundTripMismatch {
            expected: format!("{value:?}"),
            actual: format!("{restored:?}"),
        }
        .into());
    }
    Ok(restored)
}

/// Like [`try_round_trip`], and additionally check that the restored value
/// serializes to the same text.
pub fn try_stable_round_trip<T>(ctx: &SerdeContext, value: &T) -> Result<T, HarnessError>
where
    T: JsonSerialize + JsonDeserialize + PartialEq + Debug,
{
    let first = to_json(ctx, value)?;
    let restored = try_round_trip(ctx, value)?;
    let second = to_json(ctx, &restored)?;
    if first != second {
        return Err(AssertionFailure::Unstable { first, second }.into());
    }
    Ok(restored)
}

/// Round-trip `value` and panic on any failure.
///
/// # Panics
///
/// Panics when the value cannot be written or read back, or reads back as a
/// different value.
#[track_caller]
pub fn assert_json_round_trip<T>(ctx: &SerdeContext, value: &T) -> T
where
    T: JsonSerialize + JsonDeserialize + PartialEq + Debug,
{
    match try_round_trip(ctx, value) {
        Ok(restored) => restored,
        Err(e) => panic!("JSON round trip of {} failed: {e}", T::EXPECTED),
    }
}

/// [`assert_json_round_trip`] against a default context.
#[track_caller]
pub fn assert_json_round_trip_default<T>(value: &T) -> T
where
    T: JsonSerialize + JsonDeserialize + PartialEq + Debug,
{
    assert_json_round_trip(&configured_serde_context(), value)
}
