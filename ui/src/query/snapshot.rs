//! In-memory evaluation of queries against a whole database snapshot.
//!
//! The snapshot is the benchmark database exported table by table as JSON,
//! keeping the database's column names (including its `libary_id` spelling):
//!
//! ```json
//! {
//!   "libraries": [{ "id": 1, "name": "mlpack" }],
//!   "datasets":  [{ "id": 1, "name": "iris", "size": 4, "attributes": 4, "instances": 150 }],
//!   "methods":   [{ "id": 1, "name": "kmeans", "parameters": "-c 3" }],
//!   "builds":    [{ "id": 1, "build": "2014-05-12 10:30:00", "libary_id": 1 }],
//!   "results":   [{ "id": 1, "build_id": 1, "libary_id": 1, "dataset_id": 1,
//!                   "method_id": 1, "time": 0.42, "var": 0.01 }],
//!   "metrics":   [{ "id": 1, "build_id": 1, "libary_id": 1, "dataset_id": 1,
//!                   "method_id": 1, "metric": "{\"Precision\": 0.9}" }]
//! }
//! ```
//!
//! Desktop builds also read the runner's SQLite file (`benchmark.db`)
//! directly; any location ending in `.db`, `.sqlite` or `.sqlite3` is opened
//! that way.

use std::collections::{HashMap, HashSet};

use futures::future::{FutureExt, LocalBoxFuture};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{
    descriptor::{
        BuildSelection, Column, DatasetAttribute, DistinctQuery, RowOrder, Table, ValueQuery,
    },
    error::QueryError,
    row::{Payload, ResultRow},
    QueryAdapter,
};
use crate::core::{measurement::Measurement, observation::BuildStamp, platform};

#[cfg(not(target_arch = "wasm32"))]
mod sqlite;

#[derive(Debug, Clone, Deserialize)]
struct LibraryRecord {
    id: i64,
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DatasetRecord {
    id: i64,
    name: String,
    #[serde(default)]
    size: f64,
    #[serde(default)]
    attributes: f64,
    #[serde(default)]
    instances: f64,
}

impl DatasetRecord {
    fn attribute(&self, attribute: DatasetAttribute) -> f64 {
        match attribute {
            DatasetAttribute::Size => self.size,
            DatasetAttribute::Attributes => self.attributes,
            DatasetAttribute::Instances => self.instances,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct MethodRecord {
    id: i64,
    name: String,
    #[serde(default)]
    parameters: String,
}

#[derive(Debug, Clone, Deserialize)]
struct BuildRecord {
    id: i64,
    #[serde(default)]
    build: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TimingRecord {
    #[serde(default)]
    id: i64,
    build_id: i64,
    #[serde(rename = "libary_id", alias = "library_id")]
    library_id: i64,
    dataset_id: i64,
    method_id: i64,
    #[serde(deserialize_with = "measurement")]
    time: Measurement,
    #[serde(default)]
    var: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct MetricRecord {
    #[serde(default)]
    id: i64,
    build_id: i64,
    #[serde(rename = "libary_id", alias = "library_id")]
    library_id: i64,
    dataset_id: i64,
    method_id: i64,
    #[serde(deserialize_with = "payload_text")]
    metric: String,
}

fn measurement<'de, D>(deserializer: D) -> Result<Measurement, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Measurement::from_json(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unreadable runtime {raw}")))
}

fn payload_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// The raw tables of one benchmark database export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    libraries: Vec<LibraryRecord>,
    datasets: Vec<DatasetRecord>,
    methods: Vec<MethodRecord>,
    builds: Vec<BuildRecord>,
    results: Vec<TimingRecord>,
    metrics: Vec<MetricRecord>,
}

impl Snapshot {
    pub fn from_json(text: &str) -> Result<Self, QueryError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// A row of either fact table, reduced to the keys queries look at.
struct Fact<'a> {
    id: i64,
    build_id: i64,
    library_id: i64,
    dataset_id: i64,
    method_id: i64,
    payload: FactPayload<'a>,
}

enum FactPayload<'a> {
    Runtime(Measurement, Option<f64>),
    Metrics(&'a str),
}

/// A fact with its identity columns resolved.
struct Joined<'a> {
    fact: Fact<'a>,
    library: &'a LibraryRecord,
    dataset: &'a DatasetRecord,
    method: &'a MethodRecord,
    build: Option<&'a BuildRecord>,
}

pub struct SnapshotAdapter {
    snapshot: Snapshot,
    libraries: HashMap<i64, usize>,
    datasets: HashMap<i64, usize>,
    methods: HashMap<i64, usize>,
    builds: HashMap<i64, usize>,
}

impl SnapshotAdapter {
    pub fn new(snapshot: Snapshot) -> Self {
        fn index<T>(rows: &[T], id: impl Fn(&T) -> i64) -> HashMap<i64, usize> {
            rows.iter().enumerate().map(|(i, row)| (id(row), i)).collect()
        }
        Self {
            libraries: index(&snapshot.libraries, |r| r.id),
            datasets: index(&snapshot.datasets, |r| r.id),
            methods: index(&snapshot.methods, |r| r.id),
            builds: index(&snapshot.builds, |r| r.id),
            snapshot,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, QueryError> {
        Snapshot::from_json(text).map(Self::new)
    }

    /// Load a snapshot from a file path (native) or URL.
    pub async fn load(location: &str) -> Result<Self, QueryError> {
        let resolved = platform::resolve_location(location);
        tracing::info!(location = %resolved, "loading benchmark snapshot");
        let snapshot = if platform::is_sqlite(&resolved) {
            read_database(&resolved).await?
        } else {
            let text = if platform::is_http(&resolved) {
                reqwest::get(&resolved)
                    .await?
                    .error_for_status()?
                    .text()
                    .await?
            } else {
                read_local(&resolved)?
            };
            Snapshot::from_json(&text)
                .map_err(|err| QueryError::NotLoaded(format!("{resolved}: {err}")))?
        };
        let adapter = Self::new(snapshot);
        tracing::info!(
            results = adapter.snapshot.results.len(),
            metrics = adapter.snapshot.metrics.len(),
            "benchmark snapshot loaded"
        );
        Ok(adapter)
    }

    fn facts(&self, table: Table) -> Vec<Fact<'_>> {
        match table {
            Table::Timings => self
                .snapshot
                .results
                .iter()
                .map(|r| Fact {
                    id: r.id,
                    build_id: r.build_id,
                    library_id: r.library_id,
                    dataset_id: r.dataset_id,
                    method_id: r.method_id,
                    payload: FactPayload::Runtime(r.time, r.var),
                })
                .collect(),
            Table::Metrics => self
                .snapshot
                .metrics
                .iter()
                .map(|m| Fact {
                    id: m.id,
                    build_id: m.build_id,
                    library_id: m.library_id,
                    dataset_id: m.dataset_id,
                    method_id: m.method_id,
                    payload: FactPayload::Metrics(&m.metric),
                })
                .collect(),
        }
    }

    fn join(&self, table: Table) -> Vec<Joined<'_>> {
        let mut dangling = 0usize;
        let joined: Vec<Joined<'_>> = self
            .facts(table)
            .into_iter()
            .filter_map(|fact| {
                let library = self.libraries.get(&fact.library_id);
                let dataset = self.datasets.get(&fact.dataset_id);
                let method = self.methods.get(&fact.method_id);
                match (library, dataset, method) {
                    (Some(&l), Some(&d), Some(&m)) => {
                        let build = self
                            .builds
                            .get(&fact.build_id)
                            .map(|&b| &self.snapshot.builds[b]);
                        Some(Joined {
                            library: &self.snapshot.libraries[l],
                            dataset: &self.snapshot.datasets[d],
                            method: &self.snapshot.methods[m],
                            build,
                            fact,
                        })
                    }
                    _ => {
                        dangling += 1;
                        None
                    }
                }
            })
            .collect();
        if dangling > 0 {
            tracing::warn!(
                table = table.sql_name(),
                dangling,
                "skipping rows that reference unknown ids"
            );
        }
        joined
    }

    fn evaluate_distinct(&self, query: &DistinctQuery) -> Result<Vec<String>, QueryError> {
        if query.column == Column::MetricPayload && query.table == Table::Timings {
            return Err(QueryError::InvalidParameter(
                "timing rows carry no metric payload".into(),
            ));
        }
        let mut seen = HashSet::new();
        let mut values: Vec<String> = self
            .join(query.table)
            .into_iter()
            .filter(|row| matches_filter(row, query))
            .filter_map(|row| {
                let value = match query.column {
                    Column::Method => row.method.name.as_str(),
                    Column::Parameters => row.method.parameters.as_str(),
                    Column::Dataset => row.dataset.name.as_str(),
                    Column::Library => row.library.name.as_str(),
                    Column::MetricPayload => match row.fact.payload {
                        FactPayload::Metrics(text) => text,
                        FactPayload::Runtime(..) => return None,
                    },
                };
                seen.insert(value).then(|| value.to_string())
            })
            .collect();
        values.sort();
        Ok(values)
    }

    fn evaluate_values(&self, query: &ValueQuery) -> Vec<ResultRow> {
        let mut rows: Vec<Joined<'_>> = self
            .join(query.table)
            .into_iter()
            .filter(|row| {
                query.filter.matches(
                    &row.method.name,
                    &row.method.parameters,
                    &row.dataset.name,
                    &row.library.name,
                )
            })
            .collect();

        if query.builds == BuildSelection::Latest {
            let mut latest: HashMap<(i64, i64, i64), i64> = HashMap::new();
            for row in &rows {
                let key = (row.fact.method_id, row.fact.dataset_id, row.fact.library_id);
                let entry = latest.entry(key).or_insert(row.fact.build_id);
                *entry = (*entry).max(row.fact.build_id);
            }
            let mut kept = HashSet::new();
            rows.retain(|row| {
                let key = (row.fact.method_id, row.fact.dataset_id, row.fact.library_id);
                latest.get(&key) == Some(&row.fact.build_id) && kept.insert(key)
            });
        }

        match query.order {
            RowOrder::Natural => rows.sort_by_key(|row| row.fact.id),
            RowOrder::DatasetAttribute(attribute) => rows.sort_by(|a, b| {
                a.dataset
                    .attribute(attribute)
                    .total_cmp(&b.dataset.attribute(attribute))
                    .then(a.fact.id.cmp(&b.fact.id))
            }),
            RowOrder::BuildTime => rows.sort_by(|a, b| {
                let a_stamp = a.build.map(|rec| rec.build.as_str()).unwrap_or_default();
                let b_stamp = b.build.map(|rec| rec.build.as_str()).unwrap_or_default();
                a_stamp
                    .cmp(b_stamp)
                    .then(a.fact.build_id.cmp(&b.fact.build_id))
            }),
        }

        rows.into_iter().map(to_result_row).collect()
    }
}

fn matches_filter(row: &Joined<'_>, query: &DistinctQuery) -> bool {
    query.filter.matches(
        &row.method.name,
        &row.method.parameters,
        &row.dataset.name,
        &row.library.name,
    )
}

fn to_result_row(row: Joined<'_>) -> ResultRow {
    let build = BuildStamp::new(
        row.fact.build_id,
        row.build.map(|b| b.build.as_str()).unwrap_or_default(),
    );
    let payload = match row.fact.payload {
        FactPayload::Runtime(time, variance) => Payload::Runtime { time, variance },
        FactPayload::Metrics(text) => Payload::Metrics(text.to_string()),
    };
    ResultRow {
        library: row.library.name.clone(),
        dataset: row.dataset.name.clone(),
        method: row.method.name.clone(),
        parameters: row.method.parameters.clone(),
        build,
        payload,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_local(path: &str) -> Result<String, QueryError> {
    std::fs::read_to_string(path).map_err(|err| QueryError::Unreachable(format!("{path}: {err}")))
}

#[cfg(target_arch = "wasm32")]
fn read_local(path: &str) -> Result<String, QueryError> {
    Err(QueryError::Unreachable(format!(
        "{path}: browsers can only load snapshots over HTTP"
    )))
}

/// Open a SQLite snapshot, downloading it to the temp directory first when
/// it lives behind a URL.
#[cfg(not(target_arch = "wasm32"))]
async fn read_database(location: &str) -> Result<Snapshot, QueryError> {
    if !platform::is_http(location) {
        return sqlite::read_file(std::path::Path::new(location));
    }
    let bytes = reqwest::get(location)
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    let path = std::env::temp_dir().join(format!("benchview-{}.db", std::process::id()));
    std::fs::write(&path, &bytes)
        .map_err(|err| QueryError::Unreachable(format!("{}: {err}", path.display())))?;
    let snapshot = sqlite::read_file(&path);
    if let Err(err) = std::fs::remove_file(&path) {
        tracing::debug!(path = %path.display(), "could not remove downloaded database: {err}");
    }
    snapshot
}

#[cfg(target_arch = "wasm32")]
async fn read_database(location: &str) -> Result<Snapshot, QueryError> {
    Err(QueryError::NotLoaded(format!(
        "{location}: SQLite snapshots need the desktop app; export the database to JSON for the browser"
    )))
}

impl QueryAdapter for SnapshotAdapter {
    fn distinct<'a>(
        &'a self,
        query: &'a DistinctQuery,
    ) -> LocalBoxFuture<'a, Result<Vec<String>, QueryError>> {
        futures::future::ready(self.evaluate_distinct(query)).boxed_local()
    }

    fn values<'a>(
        &'a self,
        query: &'a ValueQuery,
    ) -> LocalBoxFuture<'a, Result<Vec<ResultRow>, QueryError>> {
        futures::future::ready(Ok(self.evaluate_values(query))).boxed_local()
    }
}
