//! Dashboard configuration.
//!
//! Everything has a default so an empty object (or no config at all) yields a
//! working dashboard pointed at `benchmark.json` next to the app.
//!
//! ```json
//! {
//!   "data_source": { "kind": "remote", "endpoint": "https://example.org/query" },
//!   "chart": { "width": 900 },
//!   "selection": { "datasize_comparison": "reset" },
//!   "log_level": "debug"
//! }
//! ```

use std::str::FromStr;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::Level;

use super::{error::ConfigError, selection::SelectionPolicy};

/// Environment variable holding the path of a config file (native builds).
pub const CONFIG_PATH_ENV: &str = "BENCHVIEW_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// Database snapshot loaded once and queried in memory.
    Snapshot { location: String },
    /// Endpoint accepting a `request` form field with SQL text.
    Remote { endpoint: String },
}

impl Default for DataSource {
    fn default() -> Self {
        Self::Snapshot {
            location: "benchmark.json".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 120.0,
            left: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margin: Margin::default(),
        }
    }
}

impl ChartLayout {
    pub fn outer_width(&self) -> f64 {
        self.width + self.margin.left + self.margin.right
    }

    pub fn outer_height(&self) -> f64 {
        self.height + self.margin.top + self.margin.bottom
    }
}

/// How views that re-query on a secondary control treat existing legend flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionDefaults {
    /// Applied when the datasize chart re-queries after a sort-by change.
    pub datasize_comparison: SelectionPolicy,
    /// Applied when the highest-metric table changes its sort column.
    pub highest_metric: SelectionPolicy,
}

impl Default for SelectionDefaults {
    fn default() -> Self {
        Self {
            datasize_comparison: SelectionPolicy::Preserve,
            highest_metric: SelectionPolicy::Preserve,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_source: DataSource,
    pub chart: ChartLayout,
    pub selection: SelectionDefaults,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::default(),
            chart: ChartLayout::default(),
            selection: SelectionDefaults::default(),
            log_level: "info".into(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.log_level()?;
        Ok(config)
    }

    pub fn log_level(&self) -> Result<Level, ConfigError> {
        Level::from_str(self.log_level.trim())
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    /// Read the file named by `BENCHVIEW_CONFIG`, or defaults when unset.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Use the parsed config, or defaults (with an error log) when it failed.
    pub fn or_default(result: Result<Self, ConfigError>) -> Self {
        result.unwrap_or_else(|err| {
            tracing::error!("{err}; falling back to the default configuration");
            Self::default()
        })
    }
}

/// Start logging at the configured level (info when the config failed to
/// load), then settle on the config to run with.
pub fn bootstrap(loaded: Result<DashboardConfig, ConfigError>) -> DashboardConfig {
    let level = loaded
        .as_ref()
        .ok()
        .and_then(|config| config.log_level().ok())
        .unwrap_or(Level::INFO);
    if let Err(err) = dioxus::logger::init(level) {
        eprintln!("logger already initialised: {err}");
    }
    let config = DashboardConfig::or_default(loaded);
    tracing::info!(source = ?config.data_source, %level, "dashboard configured");
    config
}

static CONFIG: OnceCell<DashboardConfig> = OnceCell::new();

/// Install the process-wide config. Only the first call has an effect.
pub fn install(config: DashboardConfig) {
    if CONFIG.set(config).is_err() {
        tracing::debug!("dashboard config already installed; ignoring");
    }
}

/// The installed config, or defaults when the launcher never installed one.
pub fn current() -> DashboardConfig {
    CONFIG.get().cloned().unwrap_or_default()
}
