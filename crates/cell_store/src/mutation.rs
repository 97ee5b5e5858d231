//! Put/Delete builders.
//!
//! Mutations are value objects: the caller accumulates column edits or delete
//! markers, hands the mutation to the client once, and never touches it
//! again. Validation happens in the client, before any gateway call; family
//! existence is a server-side concern and is not checked here.

use crate::error::{StoreError, StoreResult};

/// One `(family, qualifier, value)` edit inside a [`Put`].
///
/// A `None` timestamp asks the server to assign one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnEdit {
    pub family: Vec<u8>,
    pub qualifier: Vec<u8>,
    pub value: Vec<u8>,
    pub timestamp: Option<u64>,
}

/// Accumulates column writes for a single row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Put {
    row: Vec<u8>,
    edits: Vec<ColumnEdit>,
}

impl Put {
    pub fn new(row: impl Into<Vec<u8>>) -> Self {
        Self {
            row: row.into(),
            edits: Vec::new(),
        }
    }

    /// Adds an edit whose timestamp the server assigns.
    pub fn add_column(
        self,
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        self.push(family, qualifier, value, None)
    }

    /// Adds an edit at an explicit caller-chosen timestamp.
    pub fn add_column_at(
        self,
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
        timestamp: u64,
    ) -> Self {
        self.push(family, qualifier, value, Some(timestamp))
    }

    fn push(
        mut self,
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
        timestamp: Option<u64>,
    ) -> Self {
        self.edits.push(ColumnEdit {
            family: family.into(),
            qualifier: qualifier.into(),
            value: value.into(),
            timestamp,
        });
        self
    }

    pub fn row(&self) -> &[u8] {
        &self.row
    }

    pub fn edits(&self) -> &[ColumnEdit] {
        &self.edits
    }

    fn validate(&self) -> StoreResult<()> {
        if self.row.is_empty() {
            return Err(StoreError::invalid_mutation("put row key is empty"));
        }
        if self.edits.is_empty() {
            return Err(StoreError::invalid_mutation("put carries no column edits"));
        }
        Ok(())
    }
}

/// Deletion granularity carried by a [`Delete`].
///
/// A `Family` marker subsumes any `Column`/`Version` markers for the same
/// family; the store applies it to every qualifier and version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteMarker {
    /// All versions of all qualifiers in one family.
    Family { family: Vec<u8> },
    /// All versions of one column.
    Column { family: Vec<u8>, qualifier: Vec<u8> },
    /// Exactly one version of one column.
    Version {
        family: Vec<u8>,
        qualifier: Vec<u8>,
        timestamp: u64,
    },
}

/// Accumulates delete markers for a single row.
///
/// Markers of different granularities are composable within one `Delete`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delete {
    row: Vec<u8>,
    markers: Vec<DeleteMarker>,
}

impl Delete {
    pub fn new(row: impl Into<Vec<u8>>) -> Self {
        Self {
            row: row.into(),
            markers: Vec::new(),
        }
    }

    pub fn for_family(mut self, family: impl Into<Vec<u8>>) -> Self {
        self.markers.push(DeleteMarker::Family {
            family: family.into(),
        });
        self
    }

    pub fn for_column(
        mut self,
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
    ) -> Self {
        self.markers.push(DeleteMarker::Column {
            family: family.into(),
            qualifier: qualifier.into(),
        });
        self
    }

    pub fn for_column_version(
        mut self,
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        timestamp: u64,
    ) -> Self {
        self.markers.push(DeleteMarker::Version {
            family: family.into(),
            qualifier: qualifier.into(),
            timestamp,
        });
        self
    }

    pub fn row(&self) -> &[u8] {
        &self.row
    }

    pub fn markers(&self) -> &[DeleteMarker] {
        &self.markers
    }

    fn validate(&self) -> StoreResult<()> {
        if self.row.is_empty() {
            return Err(StoreError::invalid_mutation("delete row key is empty"));
        }
        if self.markers.is_empty() {
            return Err(StoreError::invalid_mutation("delete carries no markers"));
        }
        Ok(())
    }
}

/// Either kind of row mutation, as the gateway interface sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Put(Put),
    Delete(Delete),
}

impl Mutation {
    pub fn row(&self) -> &[u8] {
        match self {
            Mutation::Put(put) => put.row(),
            Mutation::Delete(delete) => delete.row(),
        }
    }

    pub(crate) fn validate(&self) -> StoreResult<()> {
        match self {
            Mutation::Put(put) => put.validate(),
            Mutation::Delete(delete) => delete.validate(),
        }
    }
}

impl From<Put> for Mutation {
    fn from(put: Put) -> Self {
        Mutation::Put(put)
    }
}

impl From<Delete> for Mutation {
    fn from(delete: Delete) -> Self {
        Mutation::Delete(delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_accumulates_edits_fluently() {
        let put = Put::new(b"1004")
            .add_column(b"f1", b"name", b"Jerry")
            .add_column_at(b"f1", b"age", b"12", 42);
        assert_eq!(put.row(), b"1004");
        assert_eq!(put.edits().len(), 2);
        assert_eq!(put.edits()[0].timestamp, None);
        assert_eq!(put.edits()[1].timestamp, Some(42));
    }

    #[test]
    fn empty_row_put_is_invalid() {
        let put = Put::new(Vec::new()).add_column(b"f1", b"name", b"Tom");
        assert!(matches!(
            Mutation::from(put).validate(),
            Err(StoreError::InvalidMutation { .. })
        ));
    }

    #[test]
    fn put_without_edits_is_invalid() {
        let put = Put::new(b"1001");
        assert!(matches!(
            Mutation::from(put).validate(),
            Err(StoreError::InvalidMutation { .. })
        ));
    }

    #[test]
    fn delete_composes_marker_granularities() {
        let delete = Delete::new(b"1004")
            .for_family(b"f1")
            .for_column(b"f2", b"name")
            .for_column_version(b"f2", b"age", 7);
        assert_eq!(delete.markers().len(), 3);
        assert!(Mutation::from(delete).validate().is_ok());
    }

    #[test]
    fn delete_without_markers_is_invalid() {
        assert!(matches!(
            Mutation::from(Delete::new(b"1001")).validate(),
            Err(StoreError::InvalidMutation { .. })
        ));
    }
}
