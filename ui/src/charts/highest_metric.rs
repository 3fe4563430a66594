//! Table of every metric on one dataset, sorted by a chosen metric.

use std::cmp::Ordering;

use crate::core::{
    dimension::Dimension,
    measurement::Measurement,
    selection::{SelectionPolicy, SelectionState},
};
use crate::query::{
    descriptor::{Table, ValueQuery},
    row::ResultRow,
};

use super::{
    controls::{standard_options, Choices, Control, OptionSource},
    kind::ChartKind,
    state::{AxisId, AxisLabel, ChartState, Legend},
    Chart, ChartView,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MetricTableRow {
    pub method: String,
    pub parameters: String,
    pub library: String,
    /// One value per table column; `NotRun` where the row lacks the metric.
    pub cells: Vec<Measurement>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    pub columns: Vec<String>,
    pub rows: Vec<MetricTableRow>,
    pub sort_metric: Option<String>,
}

#[derive(Debug, Clone)]
struct Entry {
    method: String,
    parameters: String,
    library: String,
    metrics: Vec<(String, Measurement)>,
}

impl Entry {
    fn metric(&self, name: &str) -> Option<Measurement> {
        self.metrics
            .iter()
            .find(|(metric, _)| metric == name)
            .map(|(_, value)| *value)
    }
}

/// Highest first. Rows without a finite value sort last, keeping their order.
fn by_metric_descending(a: Option<Measurement>, b: Option<Measurement>) -> Ordering {
    match (a.and_then(Measurement::finite), b.and_then(Measurement::finite)) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub struct HighestMetricView {
    entries: Vec<Entry>,
    sort_metric: Option<String>,
    /// Applied to both legends when the sort metric changes.
    sort_policy: SelectionPolicy,
    state: ChartState,
}

impl HighestMetricView {
    pub fn new(sort_policy: SelectionPolicy) -> Self {
        Self {
            entries: Vec::new(),
            sort_policy,
            sort_metric: None,
            state: ChartState::default(),
        }
    }
}

const LEGENDS: &[Legend] = &[
    Legend {
        axis: AxisId::Series,
        label: AxisLabel::Libraries,
    },
    Legend {
        axis: AxisId::Categories,
        label: AxisLabel::Metrics,
    },
];

impl ChartView for HighestMetricView {
    fn kind(&self) -> ChartKind {
        ChartKind::HighestMetric
    }

    fn controls(&self) -> &'static [Control] {
        &[Control::Dataset, Control::Metric]
    }

    fn options(&self, control: Control, choices: &Choices) -> Option<OptionSource> {
        standard_options(Table::Metrics, control, choices)
    }

    fn on_select(&mut self, control: Control, choices: &Choices) -> Option<ValueQuery> {
        if control == Control::Metric {
            self.sort_metric = choices.get(Control::Metric).map(str::to_string);
            if self.sort_policy == SelectionPolicy::Reset {
                self.state.series.enable_all();
                self.state.categories.enable_all();
            }
            return None;
        }
        self.clear();
        choices.get(Control::Dataset)?;
        Some(ValueQuery::latest(Table::Metrics, choices.filter()))
    }

    fn on_rows(&mut self, rows: Vec<ResultRow>) {
        self.entries = rows
            .into_iter()
            .map(|row| {
                let metrics = row.metrics().unwrap_or_else(|err| {
                    tracing::warn!(
                        method = %row.method,
                        library = %row.library,
                        "skipping metrics: {err}"
                    );
                    Vec::new()
                });
                Entry {
                    method: row.method,
                    parameters: row.parameters,
                    library: row.library,
                    metrics,
                }
            })
            .collect();

        let libraries = Dimension::extract(&self.entries, |e| e.library.as_str());
        let columns = Dimension::from_values(
            self.entries
                .iter()
                .flat_map(|e| e.metrics.iter().map(|(name, _)| name.clone())),
        );
        self.state.series.refresh(&libraries, SelectionPolicy::Reset);
        self.state.categories.refresh(&columns, SelectionPolicy::Reset);
        self.state.loaded = true;
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.sort_metric = None;
        self.state.clear();
    }

    fn build(&self) -> Chart {
        if !self.state.loaded {
            return Chart::Empty;
        }
        Chart::Table(build_table(
            &self.entries,
            &self.state.series,
            &self.state.categories,
            self.sort_metric.as_deref(),
        ))
    }

    fn legends(&self) -> &'static [Legend] {
        LEGENDS
    }

    fn state(&self) -> &ChartState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ChartState {
        &mut self.state
    }
}

fn build_table(
    entries: &[Entry],
    libraries: &SelectionState,
    columns: &SelectionState,
    sort_metric: Option<&str>,
) -> MetricTable {
    let columns = columns.active_values();
    let mut selected: Vec<&Entry> = entries
        .iter()
        .filter(|e| libraries.is_active(&e.library))
        .collect();
    if let Some(metric) = sort_metric {
        selected.sort_by(|a, b| by_metric_descending(a.metric(metric), b.metric(metric)));
    }

    let rows = selected
        .into_iter()
        .map(|entry| MetricTableRow {
            method: entry.method.clone(),
            parameters: entry.parameters.clone(),
            library: entry.library.clone(),
            cells: columns
                .iter()
                .map(|column| entry.metric(column).unwrap_or(Measurement::NotRun))
                .collect(),
        })
        .collect();

    MetricTable {
        columns,
        rows,
        sort_metric: sort_metric.map(str::to_string),
    }
}
