//! In-process gateway backed by ordered in-memory tables.
//!
//! Used by tests and the demo workload, and doubling as the reference
//! semantics for how puts, deletes, and range scans apply to versioned
//! cells. Timestamps the server assigns come from a monotonic logical clock
//! so runs are deterministic.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::cell::Cell;
use crate::error::GatewayError;
use crate::gateway::{CellBatch, ClusterGateway, GatewayCursor};
use crate::mutation::{Delete, DeleteMarker, Mutation, Put};
use crate::table::{TableDescriptor, TableRef};

struct TableData {
    descriptor: TableDescriptor,
    // Per-row cells kept in cell order at all times.
    rows: BTreeMap<Vec<u8>, Vec<Cell>>,
}

/// In-memory implementation of [`ClusterGateway`].
#[derive(Default)]
pub struct MemoryGateway {
    tables: RwLock<HashMap<String, TableData>>,
    clock: AtomicU64,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from a descriptor. Duplicate names and descriptors
    /// without column families are rejected.
    pub fn create_table(&self, descriptor: TableDescriptor) -> Result<(), GatewayError> {
        if descriptor.families.is_empty() {
            return Err(GatewayError::InvalidDescriptor(format!(
                "{}: at least one column family is required",
                descriptor.name
            )));
        }
        let mut tables = self.write_tables()?;
        let key = descriptor.name.qualified();
        if tables.contains_key(&key) {
            return Err(GatewayError::InvalidDescriptor(format!(
                "table already exists: {key}"
            )));
        }
        debug!(table = %descriptor.name, families = descriptor.families.len(), "created table");
        tables.insert(
            key,
            TableData {
                descriptor,
                rows: BTreeMap::new(),
            },
        );
        Ok(())
    }

    pub fn table_exists(&self, table: &TableRef) -> bool {
        self.tables
            .read()
            .map(|tables| tables.contains_key(&table.qualified()))
            .unwrap_or(false)
    }

    fn next_timestamp(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn write_tables(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, TableData>>, GatewayError> {
        self.tables
            .write()
            .map_err(|_| GatewayError::Unavailable("gateway state poisoned".to_string()))
    }

    fn read_tables(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, TableData>>, GatewayError> {
        self.tables
            .read()
            .map_err(|_| GatewayError::Unavailable("gateway state poisoned".to_string()))
    }

    fn apply_put(&self, data: &mut TableData, put: Put) -> Result<(), GatewayError> {
        // All server-assigned edits in one put share a single timestamp.
        let assigned = self.next_timestamp();
        for edit in put.edits() {
            let family = data.descriptor.family(&edit.family).ok_or_else(|| {
                GatewayError::UnknownFamily(String::from_utf8_lossy(&edit.family).into_owned())
            })?;
            let max_versions = family.max_versions;
            let timestamp = edit.timestamp.unwrap_or(assigned);
            let cell = Cell::new(
                put.row().to_vec(),
                edit.family.clone(),
                edit.qualifier.clone(),
                timestamp,
                edit.value.clone(),
            );
            let cells = data.rows.entry(put.row().to_vec()).or_default();
            upsert_cell(cells, cell);
            trim_versions(cells, &edit.family, &edit.qualifier, max_versions);
        }
        Ok(())
    }

    fn apply_delete(&self, data: &mut TableData, delete: Delete) {
        let row = delete.row().to_vec();
        let Some(cells) = data.rows.get_mut(&row) else {
            return;
        };
        for marker in delete.markers() {
            match marker {
                // A family marker covers every qualifier and version, so it
                // structurally subsumes finer markers for the same family.
                DeleteMarker::Family { family } => {
                    cells.retain(|c| c.family() != family.as_slice());
                }
                DeleteMarker::Column { family, qualifier } => {
                    cells.retain(|c| !c.matches_column(family, qualifier));
                }
                DeleteMarker::Version {
                    family,
                    qualifier,
                    timestamp,
                } => {
                    cells.retain(|c| {
                        !(c.matches_column(family, qualifier) && c.timestamp() == *timestamp)
                    });
                }
            }
        }
        if cells.is_empty() {
            data.rows.remove(&row);
        }
    }
}

/// Inserts a cell into an ordered per-row vector, overwriting any existing
/// version at the same (family, qualifier, timestamp).
fn upsert_cell(cells: &mut Vec<Cell>, cell: Cell) {
    let position = cells.binary_search_by(|existing| {
        existing
            .family()
            .cmp(cell.family())
            .then_with(|| existing.qualifier().cmp(cell.qualifier()))
            // Descending timestamps, matching cell order.
            .then_with(|| cell.timestamp().cmp(&existing.timestamp()))
    });
    match position {
        Ok(idx) => cells[idx] = cell,
        Err(idx) => cells.insert(idx, cell),
    }
}

/// Drops versions beyond the family's retention limit. Matching cells are
/// contiguous and newest-first, so the surplus is the tail of the span.
fn trim_versions(cells: &mut Vec<Cell>, family: &[u8], qualifier: &[u8], max_versions: usize) {
    let Some(start) = cells.iter().position(|c| c.matches_column(family, qualifier)) else {
        return;
    };
    let mut end = start;
    while end < cells.len() && cells[end].matches_column(family, qualifier) {
        end += 1;
    }
    if end - start > max_versions {
        cells.drain(start + max_versions..end);
    }
}

#[async_trait]
impl ClusterGateway for MemoryGateway {
    async fn send_mutation(
        &self,
        table: &TableRef,
        mutation: Mutation,
    ) -> Result<(), GatewayError> {
        let mut tables = self.write_tables()?;
        let data = tables
            .get_mut(&table.qualified())
            .ok_or_else(|| GatewayError::UnknownTable(table.qualified()))?;
        match mutation {
            Mutation::Put(put) => self.apply_put(data, put)?,
            Mutation::Delete(delete) => self.apply_delete(data, delete),
        }
        Ok(())
    }

    async fn fetch_row(
        &self,
        table: &TableRef,
        row: &[u8],
    ) -> Result<Option<CellBatch>, GatewayError> {
        let tables = self.read_tables()?;
        let data = tables
            .get(&table.qualified())
            .ok_or_else(|| GatewayError::UnknownTable(table.qualified()))?;
        Ok(data.rows.get(row).cloned())
    }

    async fn open_range_scan(
        &self,
        table: &TableRef,
        start: &[u8],
        stop: &[u8],
    ) -> Result<Box<dyn GatewayCursor>, GatewayError> {
        let tables = self.read_tables()?;
        let data = tables
            .get(&table.qualified())
            .ok_or_else(|| GatewayError::UnknownTable(table.qualified()))?;

        // Snapshot the range at open; start inclusive, stop exclusive, empty
        // stop meaning unbounded.
        let rows: VecDeque<CellBatch> = if !stop.is_empty() && start >= stop {
            VecDeque::new()
        } else {
            let upper = if stop.is_empty() {
                Bound::Unbounded
            } else {
                Bound::Excluded(stop.to_vec())
            };
            data.rows
                .range((Bound::Included(start.to_vec()), upper))
                .map(|(_, cells)| cells.clone())
                .collect()
        };
        Ok(Box::new(MemoryCursor {
            rows,
            released: false,
        }))
    }
}

struct MemoryCursor {
    rows: VecDeque<CellBatch>,
    released: bool,
}

#[async_trait]
impl GatewayCursor for MemoryCursor {
    async fn next_row(&mut self) -> Result<Option<CellBatch>, GatewayError> {
        if self.released {
            return Err(GatewayError::Unavailable(
                "cursor already released".to_string(),
            ));
        }
        Ok(self.rows.pop_front())
    }

    fn release(&mut self) {
        self.released = true;
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::FamilyDescriptor;

    fn gateway_with_table() -> (MemoryGateway, TableRef) {
        let gateway = MemoryGateway::new();
        let table = TableRef::new(None, "stu");
        gateway
            .create_table(TableDescriptor::new(
                table.clone(),
                vec![FamilyDescriptor::new(b"f1")],
            ))
            .expect("create table");
        (gateway, table)
    }

    #[tokio::test]
    async fn duplicate_table_rejected() {
        let (gateway, table) = gateway_with_table();
        assert!(gateway.table_exists(&table));
        let err = gateway
            .create_table(TableDescriptor::new(
                table.clone(),
                vec![FamilyDescriptor::new(b"f1")],
            ))
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidDescriptor(_)));
    }

    #[tokio::test]
    async fn descriptor_requires_a_family() {
        let gateway = MemoryGateway::new();
        let err = gateway
            .create_table(TableDescriptor::new(TableRef::new(None, "empty"), vec![]))
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidDescriptor(_)));
    }

    #[tokio::test]
    async fn unknown_family_rejected_server_side() {
        let (gateway, table) = gateway_with_table();
        let put = Put::new(b"1001").add_column(b"nope", b"name", b"Tom");
        let err = gateway
            .send_mutation(&table, put.into())
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::UnknownFamily("nope".to_string()));
    }

    #[tokio::test]
    async fn same_timestamp_overwrites_in_place() {
        let (gateway, table) = gateway_with_table();
        for value in [b"12".as_slice(), b"13".as_slice()] {
            let put = Put::new(b"1004").add_column_at(b"f1", b"age", value, 5);
            gateway.send_mutation(&table, put.into()).await.unwrap();
        }
        let cells = gateway.fetch_row(&table, b"1004").await.unwrap().unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].value(), b"13");
    }

    #[tokio::test]
    async fn versions_trim_to_family_limit() {
        let (gateway, table) = gateway_with_table();
        for ts in 1..=5u64 {
            let put = Put::new(b"1004").add_column_at(b"f1", b"age", ts.to_string(), ts);
            gateway.send_mutation(&table, put.into()).await.unwrap();
        }
        let cells = gateway.fetch_row(&table, b"1004").await.unwrap().unwrap();
        // DEFAULT_MAX_VERSIONS is 3; the two oldest versions are gone.
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0].timestamp(), 5);
        assert_eq!(cells[2].timestamp(), 3);
    }

    #[tokio::test]
    async fn server_assigned_timestamps_are_monotonic() {
        let (gateway, table) = gateway_with_table();
        for row in [b"1001", b"1003"] {
            let put = Put::new(*row).add_column(b"f1", b"name", b"Tom");
            gateway.send_mutation(&table, put.into()).await.unwrap();
        }
        let a = gateway.fetch_row(&table, b"1001").await.unwrap().unwrap();
        let b = gateway.fetch_row(&table, b"1003").await.unwrap().unwrap();
        assert!(b[0].timestamp() > a[0].timestamp());
    }

    #[tokio::test]
    async fn released_cursor_errors_on_next_row() {
        let (gateway, table) = gateway_with_table();
        let mut cursor = gateway.open_range_scan(&table, b"", b"").await.unwrap();
        cursor.release();
        assert!(cursor.next_row().await.is_err());
    }
}
