//! Scan requests and the scan cursor state machine.

use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::filter::Filter;
use crate::gateway::GatewayCursor;
use crate::row::RowResult;

/// Scan request over a row-key range `[start_row, stop_row)`.
///
/// Building a `Scan` performs no I/O; the range is only established when the
/// client opens it. Start is inclusive, stop exclusive; an empty stop row
/// means the scan is unbounded above.
#[derive(Clone, Debug, Default)]
pub struct Scan {
    start_row: Vec<u8>,
    stop_row: Vec<u8>,
    filter: Option<Filter>,
}

impl Scan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_row(mut self, start: impl Into<Vec<u8>>) -> Self {
        self.start_row = start.into();
        self
    }

    pub fn with_stop_row(mut self, stop: impl Into<Vec<u8>>) -> Self {
        self.stop_row = stop.into();
        self
    }

    pub fn with_filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn start_row(&self) -> &[u8] {
        &self.start_row
    }

    pub fn stop_row(&self) -> &[u8] {
        &self.stop_row
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub(crate) fn into_filter(self) -> Option<Filter> {
        self.filter
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CursorState {
    Open,
    Exhausted,
    Closed,
}

/// Lazy, finite, forward-only, non-restartable sequence of filtered rows.
///
/// Rows failing the filter are skipped transparently; the caller cannot
/// distinguish "no data" from "filtered out". Not safe for concurrent
/// `advance` calls: the cursor is single-owner by contract, which `&mut
/// self` enforces.
pub struct ScanCursor {
    state: CursorState,
    // Present exactly while `state == Open`.
    inner: Option<Box<dyn GatewayCursor>>,
    filter: Option<Filter>,
}

impl std::fmt::Debug for ScanCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanCursor")
            .field("state", &self.state)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl ScanCursor {
    pub(crate) fn new(inner: Box<dyn GatewayCursor>, filter: Option<Filter>) -> Self {
        Self {
            state: CursorState::Open,
            inner: Some(inner),
            filter,
        }
    }

    /// Next row passing the filter, or `Ok(None)` once the range is
    /// exhausted.
    ///
    /// A transient gateway failure releases the underlying cursor, leaves
    /// this cursor closed, and surfaces [`StoreError::ScanInterrupted`];
    /// resuming is the caller's responsibility, starting just past the last
    /// returned row. Calling `advance` after [`close`](Self::close) fails
    /// with [`StoreError::CursorClosed`].
    pub async fn advance(&mut self) -> StoreResult<Option<RowResult>> {
        loop {
            let next = match (self.state, self.inner.as_mut()) {
                (CursorState::Open, Some(cursor)) => cursor.next_row().await,
                (CursorState::Exhausted, _) => return Ok(None),
                _ => return Err(StoreError::CursorClosed),
            };
            match next {
                Ok(Some(cells)) => {
                    let result = RowResult::from_cells(cells);
                    if let Some(filter) = &self.filter {
                        if !filter.evaluate(result.cells()) {
                            trace!(row = ?result.row(), "row failed scan filter, skipping");
                            continue;
                        }
                    }
                    return Ok(Some(result));
                }
                Ok(None) => {
                    self.release_inner();
                    self.state = CursorState::Exhausted;
                    return Ok(None);
                }
                Err(err) => {
                    self.release_inner();
                    self.state = CursorState::Closed;
                    return Err(StoreError::ScanInterrupted { source: err });
                }
            }
        }
    }

    /// Cancels the scan and releases the gateway cursor. Idempotent; this is
    /// the sole cancellation primitive.
    pub fn close(&mut self) {
        self.release_inner();
        self.state = CursorState::Closed;
    }

    pub fn is_closed(&self) -> bool {
        self.state == CursorState::Closed
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == CursorState::Exhausted
    }

    fn release_inner(&mut self) {
        if let Some(mut cursor) = self.inner.take() {
            cursor.release();
        }
    }
}

impl Drop for ScanCursor {
    fn drop(&mut self) {
        // Scoped acquisition: the gateway resource is released on every exit
        // path, even when the caller never reached end of range.
        self.release_inner();
    }
}
