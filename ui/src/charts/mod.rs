//! Chart views.
//!
//! A view owns the rows of its last query and the legend selections over
//! them. The dashboard drives every view through [`ChartView`]: it asks for a
//! control's options, reports a selection (getting back the query to run, if
//! any), hands over the rows and finally asks for a [`Chart`] to draw.

pub mod comparison;
pub mod composed;
pub mod composer;
pub mod controls;
pub mod highest_metric;
pub mod kind;
pub mod params;
pub mod state;

use crate::core::{
    config::DashboardConfig, error::SelectionError, history::HistoryModel,
    view_model::ViewModel,
};
use crate::query::{descriptor::ValueQuery, row::ResultRow};

pub use comparison::ComparisonView;
pub use composed::{DatasetComparisonView, MultiParameterView};
pub use composer::{ComposerEdit, SeriesComposer, SeriesSpec};
pub use controls::{Choices, Control, Derive, OptionSource};
pub use highest_metric::{HighestMetricView, MetricTable, MetricTableRow};
pub use kind::ChartKind;
pub use state::{AxisId, AxisLabel, ChartState, Legend};

/// Unit of the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueScale {
    /// Seconds, sentinel runtimes marked on the bar.
    Runtime,
    /// Dimensionless metric score.
    Score,
}

/// What a view wants drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Empty,
    Bars { model: ViewModel, scale: ValueScale },
    Lines { model: ViewModel, scale: ValueScale },
    History(HistoryModel),
    Table(MetricTable),
}

impl Chart {
    /// A query answered but nothing survived to be drawn. The frame is still
    /// shown with its axes.
    pub fn is_blank(&self) -> bool {
        match self {
            Chart::Empty => false,
            Chart::Bars { model, .. } | Chart::Lines { model, .. } => model.is_empty(),
            Chart::History(model) => model.lines.is_empty(),
            Chart::Table(table) => table.rows.is_empty(),
        }
    }
}

pub trait ChartView {
    fn kind(&self) -> ChartKind;

    /// Select controls, in dependency order.
    fn controls(&self) -> &'static [Control];

    /// Where the options of `control` come from given the upstream choices.
    fn options(&self, control: Control, choices: &Choices) -> Option<OptionSource>;

    /// React to `control` changing. Returns the value query to run, if the
    /// choices are complete enough for one.
    fn on_select(&mut self, control: Control, choices: &Choices) -> Option<ValueQuery>;

    /// Rows answering the last query returned from [`ChartView::on_select`].
    fn on_rows(&mut self, rows: Vec<ResultRow>);

    fn clear(&mut self);

    fn build(&self) -> Chart;

    fn legends(&self) -> &'static [Legend];

    fn state(&self) -> &ChartState;

    fn state_mut(&mut self) -> &mut ChartState;

    /// Flip one legend entry. Returns the new flag.
    fn toggle(&mut self, axis: AxisId, value: &str) -> Result<bool, SelectionError> {
        self.state_mut().axis_mut(axis).toggle(value)
    }

    fn set_all(&mut self, axis: AxisId, active: bool) {
        let selection = self.state_mut().axis_mut(axis);
        if active {
            selection.enable_all();
        } else {
            selection.disable_all();
        }
    }

    /// Series composer of views that let the user assemble series.
    fn composer(&self) -> Option<&SeriesComposer> {
        None
    }

    fn compose(&mut self, _edit: ComposerEdit) {}
}

/// A fresh view for `kind`.
pub fn view_for(kind: ChartKind, config: &DashboardConfig) -> Box<dyn ChartView> {
    match kind {
        ChartKind::RuntimeComparison => Box::new(ComparisonView::runtime()),
        ChartKind::DatasizeComparison => Box::new(ComparisonView::datasize(
            config.selection.datasize_comparison,
        )),
        ChartKind::HistoricalComparison => Box::new(ComparisonView::historical()),
        ChartKind::MetricComparison => Box::new(ComparisonView::metric()),
        ChartKind::MultiParameterComparison => Box::new(MultiParameterView::new()),
        ChartKind::DatasetComparison => Box::new(DatasetComparisonView::new()),
        ChartKind::HighestMetric => Box::new(HighestMetricView::new(config.selection.highest_metric)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_builds_its_own_view() {
        let config = DashboardConfig::default();
        for kind in ChartKind::ALL {
            let view = view_for(kind, &config);
            assert_eq!(view.kind(), kind);
            assert!(!view.controls().is_empty());
            assert!(!view.legends().is_empty());
            assert_eq!(view.build(), Chart::Empty);
        }
    }

    #[test]
    fn an_answer_without_rows_draws_an_empty_frame() {
        let config = DashboardConfig::default();
        for kind in ChartKind::ALL {
            let mut view = view_for(kind, &config);
            view.on_rows(Vec::new());
            let chart = view.build();
            assert_ne!(chart, Chart::Empty, "{kind:?}");
            assert!(chart.is_blank(), "{kind:?}");
            if let Chart::Bars { model, .. } | Chart::Lines { model, .. } = &chart {
                assert_eq!(model.value_ceiling, crate::core::view_model::MIN_CEILING);
            }
            view.clear();
            assert_eq!(view.build(), Chart::Empty, "{kind:?}");
        }
    }

    #[test]
    fn only_composed_views_expose_a_composer() {
        let config = DashboardConfig::default();
        let composed: Vec<ChartKind> = ChartKind::ALL
            .into_iter()
            .filter(|kind| view_for(*kind, &config).composer().is_some())
            .collect();
        assert_eq!(
            composed,
            [ChartKind::MultiParameterComparison, ChartKind::DatasetComparison]
        );
    }

    #[test]
    fn first_control_options_need_no_choices() {
        let config = DashboardConfig::default();
        for kind in ChartKind::ALL {
            let view = view_for(kind, &config);
            let choices = Choices::new(view.controls());
            assert!(view.options(view.controls()[0], &choices).is_some());
            if let Some(second) = view.controls().get(1) {
                assert!(view.options(*second, &choices).is_none());
            }
        }
    }
}
