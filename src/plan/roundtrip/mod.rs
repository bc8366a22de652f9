//! Roundtrip tests for plan fragments.
//!
//! Tests verify that:
//! - value → JSON → value yields an equal value, and re-serializes identically
//! - optional members are omitted when unset and present when set
//! - references unknown to the context fail instead of producing broken JSON

#[cfg(test)]
pub(crate) mod common;

#[cfg(test)]
mod expr;

#[cfg(test)]
mod properties;

#[cfg(test)]
mod resolution;

#[cfg(test)]
mod source;

#[cfg(test)]
mod table;
