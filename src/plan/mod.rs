//! Plan fragments with a context-dependent JSON form.
//!
//! - [`ResolvedTable`]: catalog tables, honoring the compile/restore modes
//! - [`Expr`]: input references, literals and calls to resolved functions
//! - [`TableSourceSpec`]: a scan with optional members omitted when unset
//!
//! Types and identifiers are written as canonical strings and re-bound
//! against the context when read.

mod expr;
mod roundtrip;
mod spec;
mod table;
mod types;

pub use expr::{Expr, FunctionRef, Literal, LiteralValue};
pub use spec::{ChangelogMode, RowKind, TableSourceSpec};
pub use table::ResolvedTable;
