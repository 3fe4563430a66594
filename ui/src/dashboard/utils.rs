use crate::{
    charts::{AxisLabel, ChartKind, Control},
    core::format::parameters_label,
    query::DatasetAttribute,
    t,
};

pub(crate) fn chart_label(kind: ChartKind) -> String {
    match kind {
        ChartKind::RuntimeComparison => t!("chart-runtime-comparison"),
        ChartKind::DatasizeComparison => t!("chart-datasize-comparison"),
        ChartKind::HistoricalComparison => t!("chart-historical-comparison"),
        ChartKind::MetricComparison => t!("chart-metric-comparison"),
        ChartKind::MultiParameterComparison => t!("chart-multi-parameter-comparison"),
        ChartKind::DatasetComparison => t!("chart-dataset-comparison"),
        ChartKind::HighestMetric => t!("chart-highest-metric"),
    }
}

pub(crate) fn control_label(control: Control) -> String {
    match control {
        Control::Method => t!("control-method"),
        Control::Parameters => t!("control-parameters"),
        Control::Dataset => t!("control-dataset"),
        Control::SortBy => t!("control-sort-by"),
        Control::ParameterOption => t!("control-parameter-option"),
        Control::Metric => t!("control-metric"),
    }
}

pub(crate) fn legend_label(label: AxisLabel) -> String {
    match label {
        AxisLabel::Libraries => t!("legend-libraries"),
        AxisLabel::Datasets => t!("legend-datasets"),
        AxisLabel::Metrics => t!("legend-metrics"),
        AxisLabel::Series => t!("legend-series"),
    }
}

/// Display text of one option of `control`.
pub(crate) fn option_label(control: Control, value: &str) -> String {
    match control {
        Control::Parameters => parameters_label(value).to_string(),
        Control::SortBy => match DatasetAttribute::from_slug(value) {
            Some(DatasetAttribute::Size) => t!("sort-by-size"),
            Some(DatasetAttribute::Attributes) => t!("sort-by-attributes"),
            Some(DatasetAttribute::Instances) => t!("sort-by-instances"),
            None => value.to_string(),
        },
        _ => value.to_string(),
    }
}
