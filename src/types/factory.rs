//! Canonical type factory.
//!
//! The factory interns logical types so that equal type descriptors resolve
//! to the same `Arc`. A process-wide instance is available through
//! [`TypeFactory::global`], but contexts hold the factory as an explicit
//! `Arc` and tests may substitute their own instance.
//!
//! # Thread Safety
//!
//! Interning takes a `parking_lot::RwLock`: lookups of already interned types
//! only take the read lock, so concurrent readers never block each other.
//! Sharing the global factory between parallel tests is safe.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::logical::LogicalType;

/// Global shared type factory.
///
/// Uses `LazyLock` for thread-safe, one-time initialization on first access.
static GLOBAL_TYPE_FACTORY: LazyLock<Arc<TypeFactory>> =
    LazyLock::new(|| Arc::new(TypeFactory::new()));

/// Interning factory for logical types.
#[derive(Debug, Default)]
pub struct TypeFactory {
    types: RwLock<FxHashMap<LogicalType, Arc<LogicalType>>>,
}

impl TypeFactory {
    /// Create an empty, private factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide factory.
    pub fn global() -> Arc<TypeFactory> {
        Arc::clone(&GLOBAL_TYPE_FACTORY)
    }

    /// Return the canonical instance of `ty`.
    pub fn create_type(&self, ty: LogicalType) -> Arc<LogicalType> {
        if let Some(canonical) = self.types.read().get(&ty) {
            return Arc::clone(canonical);
        }
        let mut types = self.types.write();
        Arc::clone(types.entry(ty.clone()).or_insert_with(|| Arc::new(ty)))
    }

    /// Return the canonical instance of an already shared type.
    pub fn canonicalize(&self, ty: &Arc<LogicalType>) -> Arc<LogicalType> {
        if let Some(canonical) = self.types.read().get(ty.as_ref()) {
            return Arc::clone(canonical);
        }
        let mut types = self.types.write();
        Arc::clone(types.entry(LogicalType::clone(ty)).or_insert_with(|| Arc::clone(ty)))
    }

    /// Number of interned types.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Check whether nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}
