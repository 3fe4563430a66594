//! Views whose series the user assembles one by one.

use std::cmp::Ordering;

use crate::core::{
    dimension::Dimension, observation::Observation, selection::SelectionPolicy,
    view_model::ViewModel,
};
use crate::query::{
    descriptor::{Table, ValueQuery},
    row::ResultRow,
};

use super::{
    composer::{push_unique, ComposerEdit, SeriesComposer, SeriesSpec},
    controls::{standard_options, Choices, Control, OptionSource},
    kind::ChartKind,
    params,
    state::{AxisId, AxisLabel, ChartState, Legend},
    Chart, ChartView, ValueScale,
};

const SERIES_LEGEND: &[Legend] = &[Legend {
    axis: AxisId::Series,
    label: AxisLabel::Series,
}];

/// One metric plotted against the values of one parameter option, a line per
/// (library, remaining parameters) combination.
#[derive(Default)]
pub struct MultiParameterView {
    rows: Vec<ResultRow>,
    option: Option<String>,
    metric: Option<String>,
    composer: SeriesComposer,
    state: ChartState,
}

impl MultiParameterView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute available combinations and observations from the stored rows.
    fn rederive(&mut self, policy: SelectionPolicy) {
        let (Some(option), Some(metric)) = (self.option.as_deref(), self.metric.as_deref()) else {
            self.composer.set_available(Vec::new());
            let loaded = self.state.loaded;
            self.state.clear();
            self.state.loaded = loaded;
            return;
        };

        let mut available = Vec::new();
        let mut observations = Vec::new();
        for row in &self.rows {
            let value = params::option_value(&row.parameters, option);
            if value.is_empty() {
                continue;
            }
            let Some(score) = row.metric(metric) else {
                continue;
            };
            let spec = SeriesSpec {
                method: None,
                parameters: params::remove_option(&row.parameters, option),
                library: row.library.clone(),
            };
            if self.composer.contains(&spec) {
                observations.push(Observation::new(
                    spec.label(),
                    value,
                    score,
                    row.build.clone(),
                ));
            }
            push_unique(&mut available, spec);
        }
        self.composer.set_available(available);

        let categories = parameter_axis(&observations);
        // Newest build first so it wins duplicate (series, value) pairs.
        observations.sort_by(|a, b| b.build.id.cmp(&a.build.id));

        let series = Dimension::from_values(self.composer.chosen().iter().map(SeriesSpec::label));
        self.state
            .load_with(observations, &series, &categories, policy);
    }
}

/// Parameter values in axis order: ascending when every value is numeric,
/// otherwise first-seen.
fn parameter_axis(observations: &[Observation]) -> Dimension {
    let seen = Dimension::extract(observations, |o| o.category.as_str());
    let values = seen.values().to_vec();
    match params::numeric_values(&values) {
        Some(numbers) => {
            let mut pairs: Vec<(f64, String)> = numbers.into_iter().zip(values).collect();
            pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
            Dimension::from_values(pairs.into_iter().map(|(_, v)| v))
        }
        None => seen,
    }
}

impl ChartView for MultiParameterView {
    fn kind(&self) -> ChartKind {
        ChartKind::MultiParameterComparison
    }

    fn controls(&self) -> &'static [Control] {
        &[
            Control::Method,
            Control::Dataset,
            Control::ParameterOption,
            Control::Metric,
        ]
    }

    fn options(&self, control: Control, choices: &Choices) -> Option<OptionSource> {
        standard_options(Table::Metrics, control, choices)
    }

    fn on_select(&mut self, control: Control, choices: &Choices) -> Option<ValueQuery> {
        self.option = choices.get(Control::ParameterOption).map(str::to_string);
        self.metric = choices.get(Control::Metric).map(str::to_string);
        match control {
            Control::Method | Control::Dataset => {
                self.clear();
                self.option = None;
                self.metric = None;
                let (method, dataset) = (choices.get(Control::Method)?, choices.get(Control::Dataset)?);
                tracing::debug!(method, dataset, "fetching every build for parameter comparison");
                Some(ValueQuery::all_builds(Table::Metrics, choices.filter()))
            }
            _ => {
                self.rederive(SelectionPolicy::Preserve);
                None
            }
        }
    }

    fn on_rows(&mut self, rows: Vec<ResultRow>) {
        self.rows = rows;
        self.state.loaded = true;
        self.rederive(SelectionPolicy::Reset);
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.composer.reset();
        self.state.clear();
    }

    fn build(&self) -> Chart {
        if !self.state.loaded {
            return Chart::Empty;
        }
        Chart::Lines {
            model: ViewModel::build(
                &self.state.observations,
                &self.state.series,
                &self.state.categories,
            ),
            scale: ValueScale::Score,
        }
    }

    fn legends(&self) -> &'static [Legend] {
        SERIES_LEGEND
    }

    fn state(&self) -> &ChartState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ChartState {
        &mut self.state
    }

    fn composer(&self) -> Option<&SeriesComposer> {
        Some(&self.composer)
    }

    fn compose(&mut self, edit: ComposerEdit) {
        if self.composer.apply(edit) {
            self.rederive(SelectionPolicy::Preserve);
        }
    }
}

/// Runtimes on one dataset for user-chosen (method, parameters, library) series.
#[derive(Default)]
pub struct DatasetComparisonView {
    rows: Vec<ResultRow>,
    composer: SeriesComposer,
    state: ChartState,
}

impl DatasetComparisonView {
    pub fn new() -> Self {
        Self::default()
    }

    fn rederive(&mut self, policy: SelectionPolicy) {
        let mut available = Vec::new();
        let mut observations = Vec::new();
        for row in &self.rows {
            let spec = SeriesSpec {
                method: Some(row.method.clone()),
                parameters: row.parameters.clone(),
                library: row.library.clone(),
            };
            if self.composer.contains(&spec) {
                observations.push(Observation::new(
                    spec.label(),
                    &row.dataset,
                    row.runtime(),
                    row.build.clone(),
                ));
            }
            push_unique(&mut available, spec);
        }
        self.composer.set_available(available);

        let series = Dimension::from_values(self.composer.chosen().iter().map(SeriesSpec::label));
        let categories = Dimension::extract(&observations, |o| o.category.as_str());
        self.state
            .load_with(observations, &series, &categories, policy);
    }
}

impl ChartView for DatasetComparisonView {
    fn kind(&self) -> ChartKind {
        ChartKind::DatasetComparison
    }

    fn controls(&self) -> &'static [Control] {
        &[Control::Dataset]
    }

    fn options(&self, control: Control, choices: &Choices) -> Option<OptionSource> {
        standard_options(Table::Timings, control, choices)
    }

    fn on_select(&mut self, _control: Control, choices: &Choices) -> Option<ValueQuery> {
        self.clear();
        choices.get(Control::Dataset)?;
        Some(ValueQuery::latest(Table::Timings, choices.filter()))
    }

    fn on_rows(&mut self, rows: Vec<ResultRow>) {
        self.rows = rows;
        self.rederive(SelectionPolicy::Reset);
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.composer.reset();
        self.state.clear();
    }

    fn build(&self) -> Chart {
        if !self.state.loaded {
            return Chart::Empty;
        }
        Chart::Bars {
            model: ViewModel::build(
                &self.state.observations,
                &self.state.series,
                &self.state.categories,
            ),
            scale: ValueScale::Runtime,
        }
    }

    fn legends(&self) -> &'static [Legend] {
        SERIES_LEGEND
    }

    fn state(&self) -> &ChartState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ChartState {
        &mut self.state
    }

    fn composer(&self) -> Option<&SeriesComposer> {
        Some(&self.composer)
    }

    fn compose(&mut self, edit: ComposerEdit) {
        if self.composer.apply(edit) {
            self.rederive(SelectionPolicy::Preserve);
        }
    }
}
