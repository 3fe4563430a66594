//! Runtime and score values as stored in the benchmark database.
//!
//! A value is either a finite, non-negative number or one of three sentinel
//! states. The benchmark runner writes sentinels as negative numbers, the
//! remote endpoint as strings; both are translated here, at the adapter
//! boundary, so nothing downstream ever compares a sentinel numerically.

use serde_json::Value;

/// Numeric wire encoding of a failed run.
pub const WIRE_FAILED: f64 = -1.0;
/// Numeric wire encoding of a run that hit the time budget.
pub const WIRE_EXCEEDED: f64 = -2.0;
/// Text wire encoding of a run that hit the time budget.
pub const WIRE_EXCEEDED_TEXT: &str = ">9000";
/// Text wire encoding of a failed run.
pub const WIRE_FAILED_TEXT: &str = "failure";
/// Text used for a cell that has no run at all.
pub const WIRE_NOT_RUN_TEXT: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Finite(f64),
    /// The run hit the time budget.
    Exceeded,
    /// The run crashed or produced no result.
    Failed,
    /// No run exists for this combination.
    NotRun,
}

impl Measurement {
    /// Decode the runner's numeric encoding. Any other negative or non-finite
    /// number is treated as a failure.
    pub fn from_wire_number(value: f64) -> Self {
        if value == WIRE_EXCEEDED {
            Self::Exceeded
        } else if value.is_finite() && value >= 0.0 {
            Self::Finite(value)
        } else {
            Self::Failed
        }
    }

    /// Decode the endpoint's text encoding. Numbers frequently arrive as
    /// strings, so numeric text is accepted as well.
    pub fn from_wire_text(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" | WIRE_NOT_RUN_TEXT => Some(Self::NotRun),
            WIRE_EXCEEDED_TEXT => Some(Self::Exceeded),
            WIRE_FAILED_TEXT => Some(Self::Failed),
            other => other.parse::<f64>().ok().map(Self::from_wire_number),
        }
    }

    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::NotRun),
            Value::Number(number) => number.as_f64().map(Self::from_wire_number),
            Value::String(text) => Self::from_wire_text(text),
            _ => None,
        }
    }

    pub fn finite(self) -> Option<f64> {
        match self {
            Self::Finite(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_finite(self) -> bool {
        matches!(self, Self::Finite(_))
    }

    /// Height at which the value is drawn on a scale topped at `ceiling`.
    /// Exceeded runs are clamped to the ceiling, failures sit on the baseline
    /// and cells without a run are not drawn.
    pub fn plot_value(self, ceiling: f64) -> Option<f64> {
        match self {
            Self::Finite(value) => Some(value.min(ceiling)),
            Self::Exceeded => Some(ceiling),
            Self::Failed => Some(0.0),
            Self::NotRun => None,
        }
    }
}

/// Largest finite value in `values`, ignoring every sentinel.
pub fn finite_max<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Measurement>,
{
    values
        .into_iter()
        .filter_map(Measurement::finite)
        .fold(None, |best, value| match best {
            Some(current) if current >= value => Some(current),
            _ => Some(value),
        })
}
