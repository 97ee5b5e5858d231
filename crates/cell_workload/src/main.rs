//! Demo workload exercising the cell_store client against the in-process
//! memory gateway.
//!
//! This binary seeds the canonical student rows (plus optional synthetic
//! rows), then walks the full client surface: put, get, range scan, filtered
//! scan, and delete. It prints cells in `row:family:qualifier:value` form and
//! can record a JSON history of every operation for later inspection.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use cell_store::{
    ColumnValueFilter, CompareOp, Connection, Delete, FamilyDescriptor, FilterList, FilterOp,
    MemoryGateway, MissingColumnPolicy, Put, RowResult, Scan, StoreClient, TableDescriptor,
    TableRef,
};
use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::time;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI entry point wrapper.
#[derive(Parser, Debug)]
#[command(name = "cell-workload")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

/// Top-level CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    Run(RunArgs),
}

/// CLI options for running the demo workload.
#[derive(Parser, Debug, Clone)]
struct RunArgs {
    /// Table namespace; omit for the default namespace.
    #[arg(long)]
    namespace: Option<String>,

    /// Table name.
    #[arg(long, default_value = "stu")]
    table: String,

    /// Column family holding the demo columns.
    #[arg(long, default_value = "f1")]
    family: String,

    /// Number of extra synthetic rows to seed alongside the canonical ones.
    #[arg(long, default_value_t = 0)]
    rows: usize,

    /// Random seed for synthetic rows (0 picks a random seed).
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Pause between operations, e.g. `50ms` (useful when eyeballing logs).
    #[arg(long, default_value = "0s")]
    op_delay: humantime::Duration,

    /// Write a JSON history of every operation to this path.
    #[arg(long)]
    out: Option<PathBuf>,
}

/// Metadata embedded in the history file for reproducibility.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
struct HistoryMeta {
    namespace: Option<String>,
    table: String,
    family: String,
    rows: usize,
    seed: u64,
}

/// Full workload history.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
struct History {
    meta: HistoryMeta,
    ops: Vec<OpRecord>,
}

/// Single operation record captured during the run.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
struct OpRecord {
    op: OpKind,
    row: Option<String>,
    elapsed_us: u64,
    rows_returned: usize,
}

/// Operation kind exercised by the demo.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum OpKind {
    Put,
    Get,
    Scan,
    FilteredScan,
    Delete,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cell_workload=info,cell_store=info,warn")),
        )
        .init();

    let args = Args::parse();
    match args.cmd {
        Command::Run(args) => run(args).await,
    }
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let seed = if args.seed == 0 {
        rand::thread_rng().gen()
    } else {
        args.seed
    };
    let op_delay: Duration = args.op_delay.into();

    let table = TableRef::new(args.namespace.as_deref(), &args.table);
    let family = args.family.as_bytes().to_vec();

    // Connection lifecycle: acquired once here, shared by reference, closed
    // once at the end of the run.
    let gateway = Arc::new(MemoryGateway::new());
    gateway
        .create_table(TableDescriptor::new(
            table.clone(),
            vec![FamilyDescriptor::new(family.clone())],
        ))
        .with_context(|| format!("create table {table}"))?;
    info!(%table, "table created");

    let conn = Connection::new(gateway);
    let client = StoreClient::new(conn.clone(), table);

    let mut history = History {
        meta: HistoryMeta {
            namespace: args.namespace.clone(),
            table: args.table.clone(),
            family: args.family.clone(),
            rows: args.rows,
            seed,
        },
        ops: Vec::new(),
    };

    seed_rows(&client, &family, args.rows, seed, &mut history).await?;
    pause(op_delay).await;

    // Point read of the multi-version row.
    let result = record_get(&client, b"1004", &mut history).await?;
    info!("get 1004:");
    print_row(&result);

    pause(op_delay).await;

    // Unbounded scan over the whole table.
    let rows = record_scan(&client, Scan::new(), OpKind::Scan, &mut history).await?;
    info!(rows = rows.len(), "full scan:");
    for row in &rows {
        print_row(row);
    }

    pause(op_delay).await;

    // Filtered scan: name == "Jerry" AND age >= "12", dropping rows that
    // lack either column. Comparison is byte-lexicographic by design.
    let name = ColumnValueFilter::new(family.clone(), b"name", CompareOp::Equal, b"Jerry")
        .with_missing_policy(MissingColumnPolicy::Drop);
    let age = ColumnValueFilter::new(family.clone(), b"age", CompareOp::GreaterOrEqual, b"12")
        .with_missing_policy(MissingColumnPolicy::Drop);
    let filter = FilterList::new(FilterOp::MustPassAll, vec![name.into(), age.into()]);
    let scan = Scan::new().with_filter(filter);
    let rows = record_scan(&client, scan, OpKind::FilteredScan, &mut history).await?;
    info!(rows = rows.len(), "filtered scan (name=Jerry AND age>=12):");
    for row in &rows {
        print_row(row);
    }

    pause(op_delay).await;

    // Delete the whole family of the filtered row, then show it is gone.
    let start = Instant::now();
    client
        .delete(Delete::new(b"1004").for_family(family.clone()))
        .await
        .context("delete row 1004")?;
    history.ops.push(OpRecord {
        op: OpKind::Delete,
        row: Some("1004".to_string()),
        elapsed_us: start.elapsed().as_micros() as u64,
        rows_returned: 0,
    });
    let result = record_get(&client, b"1004", &mut history).await?;
    info!(empty = result.is_empty(), "get 1004 after delete");

    conn.close();

    if let Some(path) = &args.out {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let json = serde_json::to_string_pretty(&history).context("serialize history")?;
        std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), ops = history.ops.len(), "history written");
    }

    Ok(())
}

/// Seeds the canonical demo rows plus `extra` synthetic students.
async fn seed_rows(
    client: &StoreClient,
    family: &[u8],
    extra: usize,
    seed: u64,
    history: &mut History,
) -> anyhow::Result<()> {
    let mut puts = vec![
        Put::new(b"1001").add_column(family, b"name", b"Tom"),
        Put::new(b"1003").add_column(family, b"name", b"Tom"),
        Put::new(b"1004").add_column_at(family, b"age", b"12", 1),
        Put::new(b"1004").add_column_at(family, b"age", b"15", 2),
        Put::new(b"1004").add_column(family, b"name", b"Jerry"),
    ];

    let mut rng = SmallRng::seed_from_u64(seed);
    const NAMES: [&str; 4] = ["Spike", "Tyke", "Nibbles", "Toodles"];
    for i in 0..extra {
        let row = format!("2{i:04}");
        let name = NAMES[rng.gen_range(0..NAMES.len())];
        let age = rng.gen_range(10..20u32).to_string();
        puts.push(
            Put::new(row.into_bytes())
                .add_column(family, b"name", name)
                .add_column(family, b"age", age.into_bytes()),
        );
    }

    for put in puts {
        let row = String::from_utf8_lossy(put.row()).into_owned();
        let start = Instant::now();
        client.put(put).await.with_context(|| format!("put {row}"))?;
        history.ops.push(OpRecord {
            op: OpKind::Put,
            row: Some(row),
            elapsed_us: start.elapsed().as_micros() as u64,
            rows_returned: 0,
        });
    }
    info!(rows = 3 + extra, seed, "seeded table");
    Ok(())
}

async fn record_get(
    client: &StoreClient,
    row: &[u8],
    history: &mut History,
) -> anyhow::Result<RowResult> {
    let start = Instant::now();
    let result = client.get(row).await.context("get row")?;
    history.ops.push(OpRecord {
        op: OpKind::Get,
        row: Some(String::from_utf8_lossy(row).into_owned()),
        elapsed_us: start.elapsed().as_micros() as u64,
        rows_returned: usize::from(!result.is_empty()),
    });
    Ok(result)
}

async fn record_scan(
    client: &StoreClient,
    scan: Scan,
    op: OpKind,
    history: &mut History,
) -> anyhow::Result<Vec<RowResult>> {
    let start = Instant::now();
    let mut cursor = client.open_scan(scan).await.context("open scan")?;
    let mut rows = Vec::new();
    while let Some(row) = cursor.advance().await.context("advance scan")? {
        rows.push(row);
    }
    history.ops.push(OpRecord {
        op,
        row: None,
        elapsed_us: start.elapsed().as_micros() as u64,
        rows_returned: rows.len(),
    });
    Ok(rows)
}

/// Prints a row the way the store shell renders it, one line per cell.
fn print_row(result: &RowResult) {
    for cell in result {
        println!(
            "{}:{}:{}:{}",
            String::from_utf8_lossy(cell.row()),
            String::from_utf8_lossy(cell.family()),
            String::from_utf8_lossy(cell.qualifier()),
            String::from_utf8_lossy(cell.value()),
        );
    }
    println!("--------------------");
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        time::sleep(delay).await;
    }
}
