//! Integration tests for the put/get/delete path through the client façade.

mod common;

use anyhow::Result;
use cell_store::{Connection, Delete, Put, StoreClient, StoreError};
use common::{client_for, empty_gateway, seeded_gateway, student_table};

#[tokio::test]
async fn put_then_get_round_trips_one_cell() -> Result<()> {
    let client = client_for(empty_gateway());

    client
        .put(Put::new(b"r1").add_column(b"f1", b"name", b"Tom"))
        .await?;

    let result = client.get(b"r1").await?;
    assert_eq!(result.len(), 1);
    assert_eq!(result.row(), Some(b"r1".as_slice()));
    assert_eq!(result.value(b"f1", b"name"), Some(b"Tom".as_slice()));
    Ok(())
}

#[tokio::test]
async fn missing_row_is_an_empty_result_not_an_error() -> Result<()> {
    let client = client_for(empty_gateway());
    let result = client.get(b"nope").await?;
    assert!(result.is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_mutations_are_rejected_before_the_gateway() -> Result<()> {
    let client = client_for(empty_gateway());

    let err = client.put(Put::new(b"")).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidMutation { .. }));

    let err = client
        .put(Put::new(b"r1"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidMutation { .. }));

    let err = client.delete(Delete::new(b"r1")).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidMutation { .. }));
    Ok(())
}

#[tokio::test]
async fn family_delete_masks_the_whole_row() -> Result<()> {
    let client = client_for(seeded_gateway().await);

    client.delete(Delete::new(b"1004").for_family(b"f1")).await?;

    let result = client.get(b"1004").await?;
    assert!(result.is_empty());
    Ok(())
}

#[tokio::test]
async fn column_delete_removes_every_version() -> Result<()> {
    let client = client_for(seeded_gateway().await);

    client
        .delete(Delete::new(b"1004").for_column(b"f1", b"age"))
        .await?;

    let result = client.get(b"1004").await?;
    assert_eq!(result.value(b"f1", b"age"), None);
    assert_eq!(result.value(b"f1", b"name"), Some(b"Jerry".as_slice()));
    Ok(())
}

#[tokio::test]
async fn version_delete_exposes_the_older_version() -> Result<()> {
    let client = client_for(seeded_gateway().await);

    client
        .delete(Delete::new(b"1004").for_column_version(b"f1", b"age", 2))
        .await?;

    let result = client.get(b"1004").await?;
    assert_eq!(result.value(b"f1", b"age"), Some(b"12".as_slice()));
    Ok(())
}

#[tokio::test]
async fn family_marker_subsumes_finer_markers() -> Result<()> {
    let client = client_for(seeded_gateway().await);

    // Composing all three granularities in one delete behaves exactly like
    // the family marker alone.
    client
        .delete(
            Delete::new(b"1004")
                .for_column_version(b"f1", b"age", 2)
                .for_column(b"f1", b"name")
                .for_family(b"f1"),
        )
        .await?;

    assert!(client.get(b"1004").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn closed_connection_fails_with_not_connected() -> Result<()> {
    let gateway = seeded_gateway().await;
    let conn = Connection::new(gateway);
    let client = StoreClient::new(conn.clone(), student_table());

    // A clone shares the underlying handle, so closing here closes the
    // client's connection too.
    conn.close();

    let err = client.get(b"1001").await.unwrap_err();
    assert!(matches!(err, StoreError::NotConnected));

    let err = client
        .put(Put::new(b"1001").add_column(b"f1", b"name", b"Tom"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotConnected));

    let err = client
        .open_scan(cell_store::Scan::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotConnected));
    Ok(())
}

#[tokio::test]
async fn connection_is_shared_across_clients() -> Result<()> {
    let gateway = seeded_gateway().await;
    let conn = Connection::new(gateway);
    let a = StoreClient::new(conn.clone(), student_table());
    let b = StoreClient::new(conn.clone(), student_table());

    let from_a = a.get(b"1001").await?;
    let from_b = b.get(b"1001").await?;
    assert_eq!(from_a, from_b);

    // One close tears down every client sharing the handle.
    conn.close();
    assert!(a.get(b"1001").await.is_err());
    assert!(b.get(b"1001").await.is_err());
    Ok(())
}
