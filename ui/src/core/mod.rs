//! Query-independent core: values, dimensions, selection and the derived
//! view models every chart is drawn from.

pub mod config;
pub mod dimension;
pub mod error;
pub mod format;
pub mod history;
pub mod measurement;
pub mod observation;
pub mod platform;
pub mod selection;
pub mod view_model;

pub use config::DashboardConfig;
pub use dimension::Dimension;
pub use error::{ConfigError, MetricPayloadError, SelectionError};
pub use history::HistoryModel;
pub use measurement::Measurement;
pub use observation::{BuildStamp, Observation};
pub use selection::{SelectionPolicy, SelectionState};
pub use view_model::ViewModel;
