//! Shared helpers for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use cell_store::{
    CellBatch, ClusterGateway, Connection, FamilyDescriptor, GatewayCursor, GatewayError,
    MemoryGateway, Mutation, Put, StoreClient, TableDescriptor, TableRef,
};

/// Table used by the canonical student dataset.
pub fn student_table() -> TableRef {
    TableRef::new(None, "stu")
}

/// Gateway with the `stu` table created and nothing else.
pub fn empty_gateway() -> Arc<MemoryGateway> {
    let gateway = MemoryGateway::new();
    gateway
        .create_table(TableDescriptor::new(
            student_table(),
            vec![FamilyDescriptor::new(b"f1")],
        ))
        .expect("create stu table");
    Arc::new(gateway)
}

/// Gateway seeded with the canonical rows:
/// 1001 f1:name=Tom, 1003 f1:name=Tom,
/// 1004 f1:age=12 then f1:age=15 (two versions) and f1:name=Jerry.
pub async fn seeded_gateway() -> Arc<MemoryGateway> {
    let gateway = empty_gateway();
    let table = student_table();
    let puts = [
        Put::new(b"1001").add_column(b"f1", b"name", b"Tom"),
        Put::new(b"1003").add_column(b"f1", b"name", b"Tom"),
        Put::new(b"1004").add_column_at(b"f1", b"age", b"12", 1),
        Put::new(b"1004").add_column_at(b"f1", b"age", b"15", 2),
        Put::new(b"1004").add_column(b"f1", b"name", b"Jerry"),
    ];
    for put in puts {
        gateway
            .send_mutation(&table, put.into())
            .await
            .expect("seed put");
    }
    gateway
}

pub fn client_for(gateway: Arc<MemoryGateway>) -> StoreClient {
    StoreClient::new(Connection::new(gateway), student_table())
}

/// Gateway whose scan cursors fail transiently after a fixed number of rows.
pub struct FlakyGateway {
    inner: Arc<MemoryGateway>,
    rows_before_failure: usize,
}

impl FlakyGateway {
    pub fn new(inner: Arc<MemoryGateway>, rows_before_failure: usize) -> Self {
        Self {
            inner,
            rows_before_failure,
        }
    }
}

#[async_trait]
impl ClusterGateway for FlakyGateway {
    async fn send_mutation(
        &self,
        table: &TableRef,
        mutation: Mutation,
    ) -> Result<(), GatewayError> {
        self.inner.send_mutation(table, mutation).await
    }

    async fn fetch_row(
        &self,
        table: &TableRef,
        row: &[u8],
    ) -> Result<Option<CellBatch>, GatewayError> {
        self.inner.fetch_row(table, row).await
    }

    async fn open_range_scan(
        &self,
        table: &TableRef,
        start: &[u8],
        stop: &[u8],
    ) -> Result<Box<dyn GatewayCursor>, GatewayError> {
        let inner = self.inner.open_range_scan(table, start, stop).await?;
        Ok(Box::new(FlakyCursor {
            inner,
            remaining: self.rows_before_failure,
        }))
    }
}

struct FlakyCursor {
    inner: Box<dyn GatewayCursor>,
    remaining: usize,
}

#[async_trait]
impl GatewayCursor for FlakyCursor {
    async fn next_row(&mut self) -> Result<Option<CellBatch>, GatewayError> {
        if self.remaining == 0 {
            return Err(GatewayError::Unavailable(
                "injected transient fault".to_string(),
            ));
        }
        self.remaining -= 1;
        self.inner.next_row().await
    }

    fn release(&mut self) {
        self.inner.release();
    }
}
