//! Connection handle and the store client façade.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::gateway::ClusterGateway;
use crate::mutation::{Delete, Mutation, Put};
use crate::row::RowResult;
use crate::scan::{Scan, ScanCursor};
use crate::table::TableRef;

struct ConnectionInner {
    gateway: Arc<dyn ClusterGateway>,
    closed: AtomicBool,
}

/// Explicitly owned cluster connection.
///
/// Acquired once at process start, shared by cloning (clones share the same
/// underlying handle), and closed once at shutdown. There is no hidden
/// process-wide connection: whoever needs one gets it injected.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

impl Connection {
    pub fn new(gateway: Arc<dyn ClusterGateway>) -> Self {
        Self {
            inner: Arc::new(ConnectionInner {
                gateway,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Tears the connection down. Every subsequent operation through any
    /// clone fails with [`StoreError::NotConnected`].
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        debug!("cluster connection closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn gateway(&self) -> StoreResult<&dyn ClusterGateway> {
        if self.is_closed() {
            return Err(StoreError::NotConnected);
        }
        Ok(self.inner.gateway.as_ref())
    }
}

/// Per-table façade over the gateway: put/get/scan/delete.
///
/// Every call is independent and stateless with respect to prior calls;
/// there is no session or transaction state.
#[derive(Clone)]
pub struct StoreClient {
    conn: Connection,
    table: TableRef,
}

impl StoreClient {
    pub fn new(conn: Connection, table: TableRef) -> Self {
        Self { conn, table }
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    /// Applies a put. The mutation is validated locally before any gateway
    /// call; family existence is checked server-side, not here.
    pub async fn put(&self, put: Put) -> StoreResult<()> {
        self.send(Mutation::Put(put)).await
    }

    /// Applies a delete, honoring every marker it carries.
    pub async fn delete(&self, delete: Delete) -> StoreResult<()> {
        self.send(Mutation::Delete(delete)).await
    }

    async fn send(&self, mutation: Mutation) -> StoreResult<()> {
        mutation.validate()?;
        let gateway = self.conn.gateway()?;
        gateway.send_mutation(&self.table, mutation).await?;
        Ok(())
    }

    /// Reads one row. Semantically a scan bounded to exactly one row with no
    /// filter; a missing row is an empty result, never an error.
    pub async fn get(&self, row: &[u8]) -> StoreResult<RowResult> {
        let gateway = self.conn.gateway()?;
        match gateway.fetch_row(&self.table, row).await? {
            Some(cells) => Ok(RowResult::from_cells(cells)),
            None => Ok(RowResult::empty()),
        }
    }

    /// Opens the scan's row range and returns the cursor positioned before
    /// the first row.
    pub async fn open_scan(&self, scan: Scan) -> StoreResult<ScanCursor> {
        let gateway = self.conn.gateway()?;
        let cursor = gateway
            .open_range_scan(&self.table, scan.start_row(), scan.stop_row())
            .await?;
        Ok(ScanCursor::new(cursor, scan.into_filter()))
    }
}
