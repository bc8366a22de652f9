//! # plan-serde-harness
//!
//! Round-trip verification for JSON-serialized execution plan fragments.
//!
//! Plan fragments reference tables, functions and user-defined types by
//! name, so writing and reading them needs a context that can resolve those
//! names. This crate provides:
//!
//! - **Contexts**: minimal, fully configured [`SerdeContext`]s, built once per
//!   test from a catalog and a configuration
//! - **Round trips**: serialize a value, read it back and check equality
//! - **Structural assertions**: assert that a JSON pointer is (or is not) present
//!   in the serialized document, to test omission of optional members
//!
//! ## Quick Start
//!
//! ```ignore
//! use plan_serde_harness::prelude::*;
//! use std::time::Duration;
//!
//! let ctx = configured_serde_context();
//! let table = CatalogTable::new([Column::new("id", LogicalType::bigint().not_null())]);
//! let spec = TableSourceSpec::new(ResolvedTable::anonymous(table));
//!
//! // value -> JSON -> value must be lossless
//! assert_eq!(assert_json_round_trip(&ctx, &spec), spec);
//!
//! // unset members are omitted, set members are present
//! let doc = to_document(&ctx, &spec)?;
//! assert_json_does_not_contain(doc.tree(), ["timeout"]);
//!
//! let spec = spec.with_timeout(Duration::from_secs(30));
//! let doc = to_document(&ctx, &spec)?;
//! assert_json_contains(doc.tree(), ["timeout"]);
//! ```
//!
//! ## Modules
//!
//! - [`context`]: building serde contexts
//! - [`codec`]: context-aware serialization and the round-trip engine
//! - [`document`]: JSON pointers and structural assertions
//! - [`plan`]: plan fragments with a context-dependent JSON form
//! - [`catalog`], [`function`], [`types`]: the registries a context resolves against
//! - [`config`]: configuration keys and their validated view

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod codec;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod function;
pub mod plan;
pub mod types;

// =============================================================================
// Prelude - import commonly used items with a single `use`
// =============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use plan_serde_harness::prelude::*;
/// ```
pub mod prelude {
    // Contexts
    pub use crate::{
        configured_serde_context, configured_serde_context_with,
        configured_serde_context_with_catalog, SerdeContext,
    };

    // Round trips
    pub use crate::{
        assert_json_round_trip, assert_json_round_trip_default, to_document, to_json, to_object,
        try_round_trip, try_stable_round_trip, JsonDeserialize, JsonSerialize,
    };

    // Structural assertions
    pub use crate::{
        assert_json_contains, assert_json_does_not_contain, JsonPath, SerializedDocument,
    };

    // Catalog objects
    pub use crate::catalog::{CatalogTable, Column, InMemoryCatalog, ObjectIdentifier};
    pub use crate::config::{CatalogPlanCompilation, CatalogPlanRestore, ConfigBuilder};
    pub use crate::plan::{
        ChangelogMode, Expr, FunctionRef, LiteralValue, ResolvedTable, TableSourceSpec,
    };
    pub use crate::types::LogicalType;

    pub use crate::HarnessError;
}

// =============================================================================
// Execution context
// =============================================================================

pub use context::{
    configured_serde_context, configured_serde_context_with, configured_serde_context_with_catalog,
    configured_serde_context_with_table_config, ContextBuilder, SerdeContext,
};

// =============================================================================
// Round-trip engine
// =============================================================================

pub use codec::{
    assert_json_round_trip, assert_json_round_trip_default, to_document, to_json, to_object,
    try_round_trip, try_stable_round_trip, DeserializationError, JsonDeserialize, JsonSerialize,
    SerializationError,
};

// =============================================================================
// Structural assertions
// =============================================================================

pub use document::{
    assert_json_contains, assert_json_does_not_contain, try_json_contains,
    try_json_does_not_contain, AssertionFailure, JsonPath, SerializedDocument,
};

// =============================================================================
// Errors and configuration
// =============================================================================

pub use config::{ConfigBuilder, Configuration, ConfigurationError, TableConfig};
pub use error::{HarnessError, ReferenceKind};
