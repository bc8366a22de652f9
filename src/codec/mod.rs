//! Value ↔ JSON conversion against a serde context.
//!
//! - **Serialize**: [`to_json`], [`to_document`] (text plus parsed tree)
//! - **Deserialize**: [`to_object`], with errors located by JSON pointer
//! - **Round trip**: [`try_round_trip`], [`assert_json_round_trip`]
//!
//! Types take part by implementing [`JsonSerialize`] and [`JsonDeserialize`];
//! [`ObjectBuilder`] and [`ObjectReader`] carry the omission policy for
//! optional members.

mod builder;
mod deserialize;
mod error;
mod lookup;
mod roundtrip;
mod serialize;

pub use builder::ObjectBuilder;
pub use deserialize::{deserialize_plain, to_object, JsonDeserialize, Node, ObjectReader};
pub use error::{DeserializationError, SerializationError};
pub use lookup::{
    check_type_references, require_builtin, require_catalog_function, require_system_function,
    require_table,
};
pub use roundtrip::{
    assert_json_round_trip, assert_json_round_trip_default, try_round_trip, try_stable_round_trip,
};
pub use serialize::{serialize_plain, strip_nulls, to_document, to_json, JsonSerialize};
