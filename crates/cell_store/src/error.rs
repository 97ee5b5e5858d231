//! Error types shared across the client core.

use thiserror::Error;

/// Result alias used by the store client surface.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors originating in the cluster gateway collaborator.
///
/// The core propagates these unchanged; retry policy belongs to the gateway
/// implementation or the caller, never to the core.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("unknown column family: {0}")]
    UnknownFamily(String),

    #[error("invalid table descriptor: {0}")]
    InvalidDescriptor(String),

    /// Transient transport or storage-server failure.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    /// True when the failure is transient and the operation may be reissued.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Unavailable(_))
    }
}

/// Errors surfaced by store client operations.
///
/// A missing row is *not* an error: it is an empty [`RowResult`], and it is
/// indistinguishable from a row fully masked by filters.
///
/// [`RowResult`]: crate::row::RowResult
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Malformed mutation rejected locally before any gateway call.
    #[error("invalid mutation: {reason}")]
    InvalidMutation { reason: String },

    /// The connection handle has been closed.
    #[error("not connected to the cluster")]
    NotConnected,

    /// Transient gateway failure mid-scan. The cursor is left closed;
    /// resuming requires reissuing a range past the last returned row.
    #[error("scan interrupted")]
    ScanInterrupted {
        #[source]
        source: GatewayError,
    },

    /// `advance()` was called on a closed scan cursor.
    #[error("scan cursor is closed")]
    CursorClosed,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl StoreError {
    pub(crate) fn invalid_mutation(reason: impl Into<String>) -> Self {
        StoreError::InvalidMutation {
            reason: reason.into(),
        }
    }
}
