//! Cell model: the immutable unit of storage.
//!
//! A cell is one versioned value of one column of one row. Rows are not
//! stored entities of their own; a row is simply the set of cells sharing a
//! row key, potentially spanning several families, qualifiers, and versions.

use std::cmp::Ordering;

/// One `(row, family, qualifier, timestamp, value)` tuple.
///
/// All byte-valued fields are opaque; the model assumes no text encoding.
/// Rendering bytes as strings is a presentation concern left to callers.
///
/// Cells order by row, then family, then qualifier, then timestamp
/// *descending*, so the newest version of a column always sorts first.
/// Every consumer of a cell stream relies on this ordering.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    row: Vec<u8>,
    family: Vec<u8>,
    qualifier: Vec<u8>,
    timestamp: u64,
    value: Vec<u8>,
}

impl Cell {
    pub fn new(
        row: impl Into<Vec<u8>>,
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        timestamp: u64,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            row: row.into(),
            family: family.into(),
            qualifier: qualifier.into(),
            timestamp,
            value: value.into(),
        }
    }

    pub fn row(&self) -> &[u8] {
        &self.row
    }

    pub fn family(&self) -> &[u8] {
        &self.family
    }

    pub fn qualifier(&self) -> &[u8] {
        &self.qualifier
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// True when this cell belongs to the given column.
    pub fn matches_column(&self, family: &[u8], qualifier: &[u8]) -> bool {
        self.family == family && self.qualifier == qualifier
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.family.cmp(&other.family))
            .then_with(|| self.qualifier.cmp(&other.qualifier))
            // Newest version first: the timestamp leg is descending.
            .then_with(|| other.timestamp.cmp(&self.timestamp))
            // Value only breaks ties so `Ord` stays consistent with `Eq`.
            .then_with(|| self.value.cmp(&other.value))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
