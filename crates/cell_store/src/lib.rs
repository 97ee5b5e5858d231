//! Client core for a distributed, versioned, column-family store.
//!
//! The crate centers on two things:
//! - the cell data model: immutable `(row, family, qualifier, timestamp,
//!   value)` tuples with a total order that keeps the newest version of a
//!   column first, and
//! - the predicate engine: single-column value comparators plus AND/OR
//!   combinators, evaluated per row against a stream of versioned cells
//!   without materializing the table.
//!
//! Around that core sit mutation builders (`Put`/`Delete`), per-row results,
//! a lazy scan cursor, and a thin per-table client façade. Everything that
//! touches the network hides behind the [`ClusterGateway`] trait; an
//! in-memory gateway backs tests and the demo workload.

pub mod cell;
pub mod client;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod memory;
pub mod mutation;
pub mod row;
pub mod scan;
pub mod table;

pub use cell::Cell;
pub use client::{Connection, StoreClient};
pub use error::{GatewayError, StoreError, StoreResult};
pub use filter::{ColumnValueFilter, CompareOp, Filter, FilterList, FilterOp, MissingColumnPolicy};
pub use gateway::{CellBatch, ClusterGateway, GatewayCursor};
pub use memory::MemoryGateway;
pub use mutation::{ColumnEdit, Delete, DeleteMarker, Mutation, Put};
pub use row::RowResult;
pub use scan::{Scan, ScanCursor};
pub use table::{
    FamilyDescriptor, TableDescriptor, TableRef, DEFAULT_MAX_VERSIONS, DEFAULT_NAMESPACE,
};
