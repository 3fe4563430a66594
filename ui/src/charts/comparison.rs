//! Views that compare libraries across one query: runtime, datasize,
//! historical and metric comparison. They differ only in their query, how
//! rows become observations and how the result is drawn.

use crate::core::{
    format::format_build_time,
    observation::Observation,
    selection::SelectionPolicy,
    view_model::ViewModel,
    HistoryModel,
};
use crate::query::{
    descriptor::{DatasetAttribute, RowOrder, Table, ValueQuery},
    row::ResultRow,
};

use super::{
    controls::{standard_options, Choices, Control, OptionSource},
    kind::ChartKind,
    state::{AxisId, AxisLabel, ChartState, Legend},
    Chart, ChartView, ValueScale,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presentation {
    Bars(ValueScale),
    History,
}

struct Profile {
    kind: ChartKind,
    table: Table,
    controls: &'static [Control],
    query: fn(&Choices) -> Option<ValueQuery>,
    observe: fn(&[ResultRow]) -> Vec<Observation>,
    presentation: Presentation,
    legends: &'static [Legend],
}

const LIBRARY_AND_DATASET_LEGENDS: &[Legend] = &[
    Legend {
        axis: AxisId::Series,
        label: AxisLabel::Libraries,
    },
    Legend {
        axis: AxisId::Categories,
        label: AxisLabel::Datasets,
    },
];

const LIBRARY_LEGEND: &[Legend] = &[Legend {
    axis: AxisId::Series,
    label: AxisLabel::Libraries,
}];

const LIBRARY_AND_METRIC_LEGENDS: &[Legend] = &[
    Legend {
        axis: AxisId::Series,
        label: AxisLabel::Libraries,
    },
    Legend {
        axis: AxisId::Categories,
        label: AxisLabel::Metrics,
    },
];

static RUNTIME: Profile = Profile {
    kind: ChartKind::RuntimeComparison,
    table: Table::Timings,
    controls: &[Control::Method, Control::Parameters],
    query: runtime_query,
    observe: runtime_by_dataset,
    presentation: Presentation::Bars(ValueScale::Runtime),
    legends: LIBRARY_AND_DATASET_LEGENDS,
};

static DATASIZE: Profile = Profile {
    kind: ChartKind::DatasizeComparison,
    table: Table::Timings,
    controls: &[Control::Method, Control::Parameters, Control::SortBy],
    query: datasize_query,
    observe: runtime_by_dataset,
    presentation: Presentation::Bars(ValueScale::Runtime),
    legends: LIBRARY_AND_DATASET_LEGENDS,
};

static HISTORICAL: Profile = Profile {
    kind: ChartKind::HistoricalComparison,
    table: Table::Timings,
    controls: &[Control::Method, Control::Parameters, Control::Dataset],
    query: historical_query,
    observe: runtime_by_build,
    presentation: Presentation::History,
    legends: LIBRARY_LEGEND,
};

static METRIC: Profile = Profile {
    kind: ChartKind::MetricComparison,
    table: Table::Metrics,
    controls: &[Control::Method, Control::Parameters, Control::Dataset],
    query: metric_query,
    observe: metrics_by_name,
    presentation: Presentation::Bars(ValueScale::Score),
    legends: LIBRARY_AND_METRIC_LEGENDS,
};

fn runtime_query(choices: &Choices) -> Option<ValueQuery> {
    choices.get(Control::Method)?;
    choices.get(Control::Parameters)?;
    Some(ValueQuery::latest(Table::Timings, choices.filter()))
}

fn datasize_query(choices: &Choices) -> Option<ValueQuery> {
    let query = runtime_query(choices)?;
    let order = choices
        .get(Control::SortBy)
        .and_then(DatasetAttribute::from_slug)
        .map_or(RowOrder::Natural, RowOrder::DatasetAttribute);
    Some(query.ordered(order))
}

fn historical_query(choices: &Choices) -> Option<ValueQuery> {
    choices.get(Control::Method)?;
    choices.get(Control::Parameters)?;
    choices.get(Control::Dataset)?;
    Some(ValueQuery::history(Table::Timings, choices.filter()))
}

fn metric_query(choices: &Choices) -> Option<ValueQuery> {
    choices.get(Control::Method)?;
    choices.get(Control::Parameters)?;
    choices.get(Control::Dataset)?;
    Some(ValueQuery::latest(Table::Metrics, choices.filter()))
}

fn runtime_by_dataset(rows: &[ResultRow]) -> Vec<Observation> {
    rows.iter()
        .map(|row| {
            Observation::new(
                &row.library,
                &row.dataset,
                row.runtime(),
                row.build.clone(),
            )
        })
        .collect()
}

fn runtime_by_build(rows: &[ResultRow]) -> Vec<Observation> {
    rows.iter()
        .map(|row| {
            let category = row
                .build
                .timestamp
                .map(format_build_time)
                .unwrap_or_else(|| format!("#{}", row.build.id));
            Observation::new(&row.library, category, row.runtime(), row.build.clone())
        })
        .collect()
}

fn metrics_by_name(rows: &[ResultRow]) -> Vec<Observation> {
    let mut observations = Vec::new();
    for row in rows {
        match row.metrics() {
            Ok(metrics) => observations.extend(metrics.into_iter().map(|(name, value)| {
                Observation::new(&row.library, name, value, row.build.clone())
            })),
            Err(err) => tracing::warn!(
                library = %row.library,
                dataset = %row.dataset,
                "skipping metrics: {err}"
            ),
        }
    }
    observations
}

pub struct ComparisonView {
    profile: &'static Profile,
    state: ChartState,
    /// Applied when a sort-by change re-queries.
    sort_policy: SelectionPolicy,
    pending_policy: SelectionPolicy,
}

impl ComparisonView {
    fn with_profile(profile: &'static Profile) -> Self {
        Self {
            profile,
            state: ChartState::default(),
            sort_policy: SelectionPolicy::Reset,
            pending_policy: SelectionPolicy::Reset,
        }
    }

    pub fn runtime() -> Self {
        Self::with_profile(&RUNTIME)
    }

    pub fn datasize(sort_policy: SelectionPolicy) -> Self {
        Self {
            sort_policy,
            ..Self::with_profile(&DATASIZE)
        }
    }

    pub fn historical() -> Self {
        Self::with_profile(&HISTORICAL)
    }

    pub fn metric() -> Self {
        Self::with_profile(&METRIC)
    }
}

impl ChartView for ComparisonView {
    fn kind(&self) -> ChartKind {
        self.profile.kind
    }

    fn controls(&self) -> &'static [Control] {
        self.profile.controls
    }

    fn options(&self, control: Control, choices: &Choices) -> Option<OptionSource> {
        standard_options(self.profile.table, control, choices)
    }

    fn on_select(&mut self, control: Control, choices: &Choices) -> Option<ValueQuery> {
        let query = (self.profile.query)(choices);
        if query.is_none() {
            self.clear();
            return None;
        }
        self.pending_policy = if control == Control::SortBy {
            self.sort_policy
        } else {
            SelectionPolicy::Reset
        };
        query
    }

    fn on_rows(&mut self, rows: Vec<ResultRow>) {
        let observations = (self.profile.observe)(&rows);
        self.state.load(observations, self.pending_policy);
    }

    fn clear(&mut self) {
        self.state.clear();
    }

    fn build(&self) -> Chart {
        if !self.state.loaded {
            return Chart::Empty;
        }
        match self.profile.presentation {
            Presentation::Bars(scale) => Chart::Bars {
                model: ViewModel::build(
                    &self.state.observations,
                    &self.state.series,
                    &self.state.categories,
                ),
                scale,
            },
            Presentation::History => Chart::History(HistoryModel::build(
                &self.state.observations,
                &self.state.series,
            )),
        }
    }

    fn legends(&self) -> &'static [Legend] {
        self.profile.legends
    }

    fn state(&self) -> &ChartState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ChartState {
        &mut self.state
    }
}
