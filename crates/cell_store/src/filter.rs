//! Predicate engine: single-column value comparators and boolean combinators.
//!
//! Filters decide PASS/FAIL for a whole row given its ordered cell sequence;
//! they never filter individual versions. All filters are immutable value
//! objects with no evaluation state, so one filter instance may be shared
//! across rows, scans, and threads.
//!
//! Comparisons are byte-lexicographic, never numeric: `"9"` compares greater
//! than `"30"`. Callers that need numeric semantics must fixed-width encode
//! their values.

use std::cmp::Ordering;

use crate::cell::Cell;

/// Comparison operator applied to a column's newest value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl CompareOp {
    /// Whether the operator holds for `lhs <op> rhs` given `lhs.cmp(rhs)`.
    fn holds(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Equal => ord == Ordering::Equal,
            CompareOp::NotEqual => ord != Ordering::Equal,
            CompareOp::Greater => ord == Ordering::Greater,
            CompareOp::GreaterOrEqual => ord != Ordering::Less,
            CompareOp::Less => ord == Ordering::Less,
            CompareOp::LessOrEqual => ord != Ordering::Greater,
        }
    }
}

/// What to do with rows that lack the filtered column entirely.
///
/// The default is `Keep`: rows missing the column pass through. Flipping
/// this silently changes scan results, so it is an explicit named policy
/// rather than a hidden default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingColumnPolicy {
    #[default]
    Keep,
    Drop,
}

/// Row-level filter on the newest value of one column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnValueFilter {
    family: Vec<u8>,
    qualifier: Vec<u8>,
    op: CompareOp,
    value: Vec<u8>,
    missing: MissingColumnPolicy,
}

impl ColumnValueFilter {
    pub fn new(
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        op: CompareOp,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            family: family.into(),
            qualifier: qualifier.into(),
            op,
            value: value.into(),
            missing: MissingColumnPolicy::default(),
        }
    }

    pub fn with_missing_policy(mut self, policy: MissingColumnPolicy) -> Self {
        self.missing = policy;
        self
    }

    /// PASS/FAIL for one row's ordered cells.
    ///
    /// Only the newest version of the target column is inspected; with the
    /// cells in cell order that is the first match.
    pub fn evaluate(&self, cells: &[Cell]) -> bool {
        match cells
            .iter()
            .find(|c| c.matches_column(&self.family, &self.qualifier))
        {
            None => self.missing == MissingColumnPolicy::Keep,
            Some(cell) => self.op.holds(cell.value().cmp(self.value.as_slice())),
        }
    }
}

/// Boolean combinator for a [`FilterList`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOp {
    /// Logical AND: every child must pass.
    MustPassAll,
    /// Logical OR: at least one child must pass.
    MustPassOne,
}

/// Ordered list of filters joined by one combinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterList {
    op: FilterOp,
    filters: Vec<Filter>,
}

impl FilterList {
    pub fn new(op: FilterOp, filters: Vec<Filter>) -> Self {
        Self { op, filters }
    }

    pub fn op(&self) -> FilterOp {
        self.op
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Evaluates children with short-circuiting.
    ///
    /// An empty list passes under both combinators: the natural identity for
    /// AND, and an explicit policy (not a fallthrough) for OR.
    pub fn evaluate(&self, cells: &[Cell]) -> bool {
        match self.op {
            FilterOp::MustPassAll => self.filters.iter().all(|f| f.evaluate(cells)),
            FilterOp::MustPassOne => {
                self.filters.is_empty() || self.filters.iter().any(|f| f.evaluate(cells))
            }
        }
    }
}

/// Either a single column predicate or a combinator over child filters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    ColumnValue(ColumnValueFilter),
    List(FilterList),
}

impl Filter {
    /// PASS/FAIL for one row. Takes `&self` only; evaluation never mutates
    /// the filter, which is what makes concurrent reuse safe.
    pub fn evaluate(&self, cells: &[Cell]) -> bool {
        match self {
            Filter::ColumnValue(f) => f.evaluate(cells),
            Filter::List(list) => list.evaluate(cells),
        }
    }
}

impl From<ColumnValueFilter> for Filter {
    fn from(f: ColumnValueFilter) -> Self {
        Filter::ColumnValue(f)
    }
}

impl From<FilterList> for Filter {
    fn from(list: FilterList) -> Self {
        Filter::List(list)
    }
}
