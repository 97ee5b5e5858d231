//! Per-row results: an ordered, multi-version set of cells.

use crate::cell::Cell;

/// All cells returned for exactly one row, in cell order (family, qualifier
/// ascending; timestamp descending within a column).
///
/// An empty result means "row not found" *or* "row fully masked by filters";
/// the two are intentionally indistinguishable to the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowResult {
    cells: Vec<Cell>,
}

impl RowResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a result from one row's raw cell batch, restoring cell order.
    pub fn from_cells(mut cells: Vec<Cell>) -> Self {
        cells.sort_unstable();
        Self { cells }
    }

    /// Row key, or `None` for an empty result.
    pub fn row(&self) -> Option<&[u8]> {
        self.cells.first().map(Cell::row)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Newest version of one column, if the row has it.
    pub fn latest(&self, family: &[u8], qualifier: &[u8]) -> Option<&Cell> {
        // Cells are ordered, so the first match is the newest version.
        self.cells
            .iter()
            .find(|c| c.matches_column(family, qualifier))
    }

    /// Newest value of one column.
    pub fn value(&self, family: &[u8], qualifier: &[u8]) -> Option<&[u8]> {
        self.latest(family, qualifier).map(Cell::value)
    }
}

impl<'a> IntoIterator for &'a RowResult {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
