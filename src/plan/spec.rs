//! Table source specification: the scan node of a compiled plan.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::expr::Expr;
use super::table::ResolvedTable;
use crate::codec::{
    deserialize_plain, serialize_plain, DeserializationError, JsonDeserialize, JsonSerialize, Node,
    ObjectBuilder, SerializationError,
};
use crate::context::SerdeContext;

// =============================================================================
// Changelog mode
// =============================================================================

/// Kind of change a row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowKind {
    /// Insertion.
    Insert,
    /// Retraction of the previous version of an updated row.
    UpdateBefore,
    /// New version of an updated row.
    UpdateAfter,
    /// Deletion.
    Delete,
}

/// Set of row kinds a source may produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangelogMode {
    kinds: BTreeSet<RowKind>,
}

impl Default for ChangelogMode {
    fn default() -> Self {
        Self::insert_only()
    }
}

impl ChangelogMode {
    /// Only inserts.
    pub fn insert_only() -> Self {
        Self::from_kinds([RowKind::Insert])
    }

    /// Inserts, update-afters and deletes.
    pub fn upsert() -> Self {
        Self::from_kinds([RowKind::Insert, RowKind::UpdateAfter, RowKind::Delete])
    }

    /// Every kind.
    pub fn all() -> Self {
        Self::from_kinds([
            RowKind::Insert,
            RowKind::UpdateBefore,
            RowKind::UpdateAfter,
            RowKind::Delete,
        ])
    }

    /// Build from an explicit set of kinds.
    ///
    /// A mode needs at least one kind to be written.
    pub fn from_kinds(kinds: impl IntoIterator<Item = RowKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Whether `kind` can occur.
    pub fn contains(&self, kind: RowKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Whether only inserts can occur.
    pub fn is_insert_only(&self) -> bool {
        self.kinds.len() == 1 && self.contains(RowKind::Insert)
    }

    /// The kinds, in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = RowKind> + '_ {
        self.kinds.iter().copied()
    }
}

impl JsonSerialize for ChangelogMode {
    fn serialize_json(&self, _ctx: &SerdeContext) -> Result<Value, SerializationError> {
        if self.kinds.is_empty() {
            return Err(SerializationError::unsupported("changelog mode", "no row kinds"));
        }
        serialize_plain(self)
    }
}

impl JsonDeserialize for ChangelogMode {
    const EXPECTED: &'static str = "changelog mode";

    fn deserialize_json(_ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let mode: ChangelogMode = deserialize_plain(&node, Self::EXPECTED)?;
        if mode.kinds.is_empty() {
            return Err(node.invalid(Self::EXPECTED, "no row kinds"));
        }
        Ok(mode)
    }
}

// =============================================================================
// TableSourceSpec
// =============================================================================

const TABLE: &str = "table";
const PROJECTION: &str = "projection";
const FILTERS: &str = "filters";
const LIMIT: &str = "limit";
const TIMEOUT: &str = "timeout";
const CHANGELOG_MODE: &str = "changelogMode";

/// Everything needed to re-create a table scan.
///
/// Members left at their defaults are omitted from the JSON:
/// no projection, no filters, no limit, no timeout, insert-only changelog.
///
/// # Example
///
/// ```ignore
/// let spec = TableSourceSpec::new(ResolvedTable::lookup(&ctx, &id)?)
///     .with_projection([0, 2])
///     .with_timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableSourceSpec {
    table: ResolvedTable,
    projection: Option<Vec<u32>>,
    filters: Vec<Expr>,
    limit: Option<u64>,
    timeout: Option<Duration>,
    changelog_mode: ChangelogMode,
}

impl TableSourceSpec {
    /// Scan every column of `table`.
    pub fn new(table: ResolvedTable) -> Self {
        Self {
            table,
            projection: None,
            filters: Vec::new(),
            limit: None,
            timeout: None,
            changelog_mode: ChangelogMode::default(),
        }
    }

    /// Read only the given column indices.
    pub fn with_projection(mut self, columns: impl IntoIterator<Item = u32>) -> Self {
        self.projection = Some(columns.into_iter().collect());
        self
    }

    /// Push a filter into the source.
    pub fn with_filter(mut self, filter: Expr) -> Self {
        self.filters.push(filter);
        self
    }

    /// Stop after `limit` rows.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Give up after `timeout`; written in whole seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the changelog mode.
    pub fn with_changelog_mode(mut self, mode: ChangelogMode) -> Self {
        self.changelog_mode = mode;
        self
    }

    /// The scanned table.
    pub fn table(&self) -> &ResolvedTable {
        &self.table
    }

    /// Projected column indices.
    pub fn projection(&self) -> Option<&[u32]> {
        self.projection.as_deref()
    }

    /// Pushed-down filters.
    pub fn filters(&self) -> &[Expr] {
        &self.filters
    }

    /// Row limit.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Scan timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Changelog mode.
    pub fn changelog_mode(&self) -> &ChangelogMode {
        &self.changelog_mode
    }
}

impl JsonSerialize for TableSourceSpec {
    fn serialize_json(&self, ctx: &SerdeContext) -> Result<Value, SerializationError> {
        let timeout = match self.timeout {
            Some(timeout) if timeout.subsec_nanos() != 0 => {
                return Err(SerializationError::unsupported(
                    "timeout",
                    format!("{timeout:?} is not a whole number of seconds"),
                ));
            }
            Some(timeout) => Some(timeout.as_secs()),
            None => None,
        };
        let changelog_mode =
            (!self.changelog_mode.is_insert_only()).then_some(&self.changelog_mode);

        Ok(ObjectBuilder::new(ctx)
            .field(TABLE, &self.table)?
            .field_opt(PROJECTION, self.projection.as_ref())?
            .field_nonempty(FILTERS, self.filters.as_slice())?
            .field_opt(LIMIT, self.limit.as_ref())?
            .field_opt(TIMEOUT, timeout.as_ref())?
            .field_opt(CHANGELOG_MODE, changelog_mode)?
            .build())
    }
}

impl JsonDeserialize for TableSourceSpec {
    const EXPECTED: &'static str = "table source spec";

    fn deserialize_json(ctx: &SerdeContext, node: Node<'_>) -> Result<Self, DeserializationError> {
        let obj = node.object(Self::EXPECTED)?;
        Ok(Self {
            table: obj.required(ctx, TABLE)?,
            projection: obj.optional(ctx, PROJECTION)?,
            filters: obj.list_or_empty(ctx, FILTERS)?,
            limit: obj.optional(ctx, LIMIT)?,
            timeout: obj.optional::<u64>(ctx, TIMEOUT)?.map(Duration::from_secs),
            changelog_mode: obj.optional(ctx, CHANGELOG_MODE)?.unwrap_or_default(),
        })
    }
}
