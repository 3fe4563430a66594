use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("`{0}` is not a value of this dimension")]
    UnknownValue(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown log level `{0}`")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricPayloadError {
    #[error("metric payload is not valid JSON: {0}")]
    Json(String),
    #[error("metric payload is not an object")]
    NotAnObject,
    #[error("metric `{0}` has a non-numeric value")]
    BadValue(String),
}
