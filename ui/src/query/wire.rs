//! Decoding of the remote endpoint's JSON answers.
//!
//! The endpoint answers with an array of row objects, or with
//! `{"error": "..."}`. Numbers may arrive as JSON numbers or as numeric
//! strings, and runtime sentinels as `">9000"` / `"failure"`.

use serde_json::{Map, Value};

use super::{
    descriptor::Table,
    error::QueryError,
    row::{Payload, ResultRow},
};
use crate::core::{measurement::Measurement, observation::BuildStamp};

fn row_objects(body: &str) -> Result<Vec<Map<String, Value>>, QueryError> {
    match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(QueryError::Malformed(format!(
                    "expected a row object, found {other}"
                ))),
            })
            .collect(),
        Value::Object(map) => match map.get("error") {
            Some(Value::String(message)) => Err(QueryError::Rejected(message.clone())),
            Some(other) => Err(QueryError::Rejected(other.to_string())),
            None => Err(QueryError::Malformed("expected an array of rows".into())),
        },
        other => Err(QueryError::Malformed(format!(
            "expected an array of rows, found {other}"
        ))),
    }
}

fn text_field(row: &Map<String, Value>, key: &str) -> Result<String, QueryError> {
    match row.get(key) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(Value::Null) => Ok(String::new()),
        Some(other) => Err(QueryError::Malformed(format!(
            "field `{key}` is not text: {other}"
        ))),
        None => Err(QueryError::Malformed(format!("missing field `{key}`"))),
    }
}

fn number_field(row: &Map<String, Value>, key: &str) -> Option<f64> {
    match row.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn id_field(row: &Map<String, Value>, key: &str) -> Result<i64, QueryError> {
    match row.get(key) {
        Some(Value::Number(number)) => number
            .as_i64()
            .ok_or_else(|| QueryError::Malformed(format!("field `{key}` is not an integer"))),
        Some(Value::String(text)) => text
            .trim()
            .parse()
            .map_err(|_| QueryError::Malformed(format!("field `{key}` is not an integer"))),
        _ => Err(QueryError::Malformed(format!("missing field `{key}`"))),
    }
}

/// Decode the answer to a distinct query. Each row carries a `value` field.
pub fn decode_distinct(body: &str) -> Result<Vec<String>, QueryError> {
    row_objects(body)?
        .iter()
        .map(|row| text_field(row, "value"))
        .collect()
}

/// Decode the answer to a value query against `table`.
pub fn decode_rows(body: &str, table: Table) -> Result<Vec<ResultRow>, QueryError> {
    row_objects(body)?
        .iter()
        .map(|row| decode_row(row, table))
        .collect()
}

fn decode_row(row: &Map<String, Value>, table: Table) -> Result<ResultRow, QueryError> {
    let payload = match table {
        Table::Timings => {
            let raw = row.get("time").unwrap_or(&Value::Null);
            let time = Measurement::from_json(raw)
                .ok_or_else(|| QueryError::Malformed(format!("unreadable runtime {raw}")))?;
            Payload::Runtime {
                time,
                variance: number_field(row, "var"),
            }
        }
        Table::Metrics => match row.get("metric") {
            Some(Value::String(text)) => Payload::Metrics(text.clone()),
            Some(Value::Object(map)) => Payload::Metrics(Value::Object(map.clone()).to_string()),
            _ => return Err(QueryError::Malformed("missing field `metric`".into())),
        },
    };

    Ok(ResultRow {
        library: text_field(row, "library")?,
        dataset: text_field(row, "dataset")?,
        method: text_field(row, "method")?,
        parameters: text_field(row, "parameters")?,
        build: BuildStamp::new(id_field(row, "build_id")?, &text_field(row, "build")?),
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_timing_rows_with_string_sentinels() {
        let body = r#"[
            {"library": "mlpack", "dataset": "iris", "method": "kmeans", "parameters": "-c 3",
             "build_id": 4, "build": "2014-02-01 10:00:00", "time": "1.25", "var": 0.1},
            {"library": "shogun", "dataset": "iris", "method": "kmeans", "parameters": "-c 3",
             "build_id": "5", "build": "2014-02-01 10:00:00", "time": ">9000", "var": null},
            {"library": "weka", "dataset": "iris", "method": "kmeans", "parameters": null,
             "build_id": 6, "build": "2014-02-01 10:00:00", "time": "failure"}
        ]"#;
        let rows = decode_rows(body, Table::Timings).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].runtime(), Measurement::Finite(1.25));
        assert_eq!(rows[1].runtime(), Measurement::Exceeded);
        assert_eq!(rows[1].build.id, 5);
        assert_eq!(rows[2].runtime(), Measurement::Failed);
        assert_eq!(rows[2].parameters, "");
        assert!(matches!(rows[0].payload, Payload::Runtime { variance: Some(v), .. } if v == 0.1));
    }

    #[test]
    fn decodes_metric_rows() {
        let body = r#"[{"library": "mlpack", "dataset": "iris", "method": "nbc", "parameters": "",
            "build_id": 1, "build": "2014-01-01 00:00:00", "metric": {"Precision": 0.8}}]"#;
        let rows = decode_rows(body, Table::Metrics).unwrap();
        assert_eq!(rows[0].metric("Precision"), Some(Measurement::Finite(0.8)));
    }

    #[test]
    fn endpoint_errors_surface() {
        assert_eq!(
            decode_distinct(r#"{"error": "no such table"}"#),
            Err(QueryError::Rejected("no such table".into()))
        );
        assert!(matches!(decode_distinct("<html>"), Err(QueryError::Malformed(_))));
        assert!(matches!(decode_distinct("[1, 2]"), Err(QueryError::Malformed(_))));
    }

    #[test]
    fn distinct_values_accept_numbers() {
        let values = decode_distinct(r#"[{"value": "iris"}, {"value": 3}, {"value": ""}]"#).unwrap();
        assert_eq!(values, ["iris", "3", ""]);
    }

    #[test]
    fn missing_identity_fields_are_malformed() {
        let body = r#"[{"dataset": "iris", "method": "pca", "parameters": "",
            "build_id": 1, "build": "2014-01-01 00:00:00", "time": 1.0}]"#;
        assert!(matches!(
            decode_rows(body, Table::Timings),
            Err(QueryError::Malformed(_))
        ));
    }
}
