//! Abstract interface to the cluster.
//!
//! The gateway is the only seam through which the core reaches storage
//! servers. Connection establishment, discovery, transport framing, and
//! retry policy all live behind this trait; the core never re-creates the
//! gateway per call, it is handed one long-lived shared handle.

use async_trait::async_trait;

use crate::cell::Cell;
use crate::error::GatewayError;
use crate::mutation::Mutation;
use crate::table::TableRef;

/// One row's raw cells as returned by the gateway, in no particular order.
pub type CellBatch = Vec<Cell>;

/// Long-lived handle to the cluster, shared by any number of concurrent
/// store client operations.
#[async_trait]
pub trait ClusterGateway: Send + Sync {
    /// Applies a put or delete to one row. Acknowledgment only; the gateway
    /// reports failures as errors rather than partial results.
    async fn send_mutation(&self, table: &TableRef, mutation: Mutation)
        -> Result<(), GatewayError>;

    /// Fetches every cell of one row. `Ok(None)` means the row does not
    /// exist, which the client surfaces as an empty result, not an error.
    async fn fetch_row(
        &self,
        table: &TableRef,
        row: &[u8],
    ) -> Result<Option<CellBatch>, GatewayError>;

    /// Opens a cursor over the row range `[start, stop)`. An empty `stop`
    /// means unbounded.
    async fn open_range_scan(
        &self,
        table: &TableRef,
        start: &[u8],
        stop: &[u8],
    ) -> Result<Box<dyn GatewayCursor>, GatewayError>;
}

/// Server-side scan cursor resource. Single-owner, sequential access.
#[async_trait]
pub trait GatewayCursor: Send {
    /// Next row's raw cell batch, or `Ok(None)` at end of range.
    async fn next_row(&mut self) -> Result<Option<CellBatch>, GatewayError>;

    /// Releases the server-side resource. Must be idempotent; callers invoke
    /// it on every exit path, including error paths.
    fn release(&mut self);
}
