//! Reading the benchmark runner's SQLite database directly.
//!
//! The runner writes `benchmark.db`; desktop builds open it read-only and
//! copy every table into a [`Snapshot`], so the JSON export is only needed in
//! the browser. Older databases may lack the `metrics` table; a missing table
//! reads as empty.

use std::path::Path;

use rusqlite::{Connection, OpenFlags, Row};

use super::{
    BuildRecord, DatasetRecord, LibraryRecord, MethodRecord, MetricRecord, Snapshot, TimingRecord,
};
use crate::core::measurement::Measurement;
use crate::query::error::QueryError;

pub fn read_file(path: &Path) -> Result<Snapshot, QueryError> {
    let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|err| QueryError::Unreachable(format!("{}: {err}", path.display())))?;
    read_connection(&connection)
}

pub fn read_connection(connection: &Connection) -> Result<Snapshot, QueryError> {
    Ok(Snapshot {
        libraries: read_table(connection, "libraries", "id, name", |row| {
            Ok(LibraryRecord {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?,
        datasets: read_table(
            connection,
            "datasets",
            "id, name, size, attributes, instances",
            |row| {
                Ok(DatasetRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    size: row.get::<_, Option<f64>>(2)?.unwrap_or_default(),
                    attributes: row.get::<_, Option<f64>>(3)?.unwrap_or_default(),
                    instances: row.get::<_, Option<f64>>(4)?.unwrap_or_default(),
                })
            },
        )?,
        methods: read_table(connection, "methods", "id, name, parameters", |row| {
            Ok(MethodRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                parameters: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })?,
        builds: read_table(connection, "builds", "id, build", |row| {
            Ok(BuildRecord {
                id: row.get(0)?,
                build: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            })
        })?,
        results: read_table(
            connection,
            "results",
            "id, build_id, libary_id, dataset_id, method_id, time, var",
            |row| {
                Ok(TimingRecord {
                    id: row.get(0)?,
                    build_id: row.get(1)?,
                    library_id: row.get(2)?,
                    dataset_id: row.get(3)?,
                    method_id: row.get(4)?,
                    time: row
                        .get::<_, Option<f64>>(5)?
                        .map_or(Measurement::NotRun, Measurement::from_wire_number),
                    var: row.get(6)?,
                })
            },
        )?,
        metrics: read_table(
            connection,
            "metrics",
            "id, build_id, libary_id, dataset_id, method_id, metric",
            |row| {
                Ok(MetricRecord {
                    id: row.get(0)?,
                    build_id: row.get(1)?,
                    library_id: row.get(2)?,
                    dataset_id: row.get(3)?,
                    method_id: row.get(4)?,
                    metric: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                })
            },
        )?,
    })
}

fn read_table<T>(
    connection: &Connection,
    table: &str,
    columns: &str,
    decode: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>, QueryError> {
    if !has_table(connection, table)? {
        tracing::warn!(table, "benchmark database has no such table");
        return Ok(Vec::new());
    }
    let mut statement = connection.prepare(&format!("SELECT {columns} FROM {table} ORDER BY id"))?;
    let rows = statement.query_map([], decode)?;
    let decoded = rows.collect::<rusqlite::Result<Vec<T>>>()?;
    tracing::debug!(table, rows = decoded.len(), "read benchmark table");
    Ok(decoded)
}

fn has_table(connection: &Connection, table: &str) -> Result<bool, QueryError> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
