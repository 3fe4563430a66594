use serde_json::Value;

use crate::core::{error::MetricPayloadError, measurement::Measurement, observation::BuildStamp};

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Runtime {
        time: Measurement,
        variance: Option<f64>,
    },
    /// Metrics JSON text as stored; parsed on demand.
    Metrics(String),
}

/// One row returned by a value query. Immutable once fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub library: String,
    pub dataset: String,
    pub method: String,
    pub parameters: String,
    pub build: BuildStamp,
    pub payload: Payload,
}

impl ResultRow {
    /// Runtime of a timing row. Metric rows have none.
    pub fn runtime(&self) -> Measurement {
        match self.payload {
            Payload::Runtime { time, .. } => time,
            Payload::Metrics(_) => Measurement::NotRun,
        }
    }

    /// Parsed metrics of a metric row, in payload order.
    pub fn metrics(&self) -> Result<Vec<(String, Measurement)>, MetricPayloadError> {
        match &self.payload {
            Payload::Metrics(text) => parse_metric_payload(text),
            Payload::Runtime { .. } => Ok(Vec::new()),
        }
    }

    /// One named metric. Malformed payloads are logged and count as missing.
    pub fn metric(&self, name: &str) -> Option<Measurement> {
        match self.metrics() {
            Ok(metrics) => metrics
                .into_iter()
                .find(|(metric, _)| metric == name)
                .map(|(_, value)| value),
            Err(err) => {
                tracing::warn!(
                    method = %self.method,
                    dataset = %self.dataset,
                    library = %self.library,
                    "skipping metrics: {err}"
                );
                None
            }
        }
    }
}

pub fn parse_metric_payload(text: &str) -> Result<Vec<(String, Measurement)>, MetricPayloadError> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| MetricPayloadError::Json(err.to_string()))?;
    let Value::Object(map) = value else {
        return Err(MetricPayloadError::NotAnObject);
    };
    map.into_iter()
        .map(|(name, raw)| match Measurement::from_json(&raw) {
            Some(value) => Ok((name, value)),
            None => Err(MetricPayloadError::BadValue(name)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric_row(payload: &str) -> ResultRow {
        ResultRow {
            library: "mlpack".into(),
            dataset: "iris".into(),
            method: "nbc".into(),
            parameters: String::new(),
            build: BuildStamp::new(1, "2014-01-01 00:00:00"),
            payload: Payload::Metrics(payload.into()),
        }
    }

    #[test]
    fn parses_metrics_in_order() {
        let row = metric_row(r#"{"Precision": 0.9, "Recall": "0.75", "MSE": "failure"}"#);
        let metrics = row.metrics().unwrap();
        let names: Vec<&str> = metrics.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Precision", "Recall", "MSE"]);
        assert_eq!(metrics[1].1, Measurement::Finite(0.75));
        assert_eq!(metrics[2].1, Measurement::Failed);
        assert_eq!(row.metric("Precision"), Some(Measurement::Finite(0.9)));
        assert_eq!(row.runtime(), Measurement::NotRun);
    }

    #[test]
    fn malformed_payloads_are_errors() {
        assert!(matches!(
            parse_metric_payload("{oops"),
            Err(MetricPayloadError::Json(_))
        ));
        assert_eq!(
            parse_metric_payload("[1, 2]"),
            Err(MetricPayloadError::NotAnObject)
        );
        assert_eq!(
            parse_metric_payload(r#"{"F1": [1]}"#),
            Err(MetricPayloadError::BadValue("F1".into()))
        );
    }

    #[test]
    fn malformed_payload_counts_as_missing_metric() {
        assert_eq!(metric_row("not json").metric("Precision"), None);
    }
}
